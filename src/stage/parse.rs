//! Parse and Validate stages.

use super::traits::{Stage, StageId, StageResult};
use super::unit::BindingUnit;
use crate::binding::{validate, ParsedBindings};

#[derive(Debug, Default)]
pub struct ParseStage;

impl Stage for ParseStage {
    fn id(&self) -> StageId {
        StageId::Parse
    }

    fn process(&self, mut unit: BindingUnit) -> StageResult {
        match ParsedBindings::parse(&unit.header) {
            Ok(bindings) => {
                unit.bindings = Some(bindings);
                unit.advance_stage();
                StageResult::with_requests(unit, vec![StageId::Validate])
            }
            Err(e) => StageResult::failed(unit, e),
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidateStage;

impl Stage for ValidateStage {
    fn id(&self) -> StageId {
        StageId::Validate
    }

    fn process(&self, mut unit: BindingUnit) -> StageResult {
        let result = match unit.bindings.as_ref() {
            Some(bindings) => validate(bindings),
            None => return StageResult::failed(unit, "validate requires a parsed header"),
        };

        match result {
            Ok(accessors) => {
                unit.accessors = accessors;
                unit.advance_stage();
                StageResult::with_requests(unit, vec![StageId::RenderDart])
            }
            Err(e) => StageResult::failed(unit, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requests_validate() {
        let unit = BindingUnit::new(
            "two",
            include_str!("../../fixtures/two_structs_binding.h"),
        );
        let result = ParseStage.process(unit);

        assert_eq!(result.requests, vec![StageId::Validate]);
        assert_eq!(result.unit.stage_num, 1);
        assert_eq!(result.unit.bindings.as_ref().unwrap().structs.len(), 2);
    }

    #[test]
    fn test_validate_failure_is_terminal() {
        let unit = BindingUnit::new(
            "broken",
            "typedef struct Baz Baz;\nconst char *rid_baz_name(struct Baz *ptr);\n",
        );
        let parsed = ParseStage.process(unit);
        let result = ValidateStage.process(parsed.unit);

        assert!(result.requests.is_empty());
        assert!(result.unit.is_failed());
        assert!(result.unit.error.unwrap().contains("rid_baz_name_len"));
    }

    #[test]
    fn test_validate_without_parse() {
        let result = ValidateStage.process(BindingUnit::new("raw", ""));
        assert!(result.unit.is_failed());
    }
}
