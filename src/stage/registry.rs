//! Registry of the stages a runtime can dispatch to.

use super::traits::{Stage, StageId, StageResult};
use super::unit::BindingUnit;
use super::{DartModuleSettings, ParseStage, RenderDartStage, RenderSwiftStage, ValidateStage};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct StageRegistry {
    stages: HashMap<StageId, Arc<dyn Stage>>,
}

impl StageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stage, with default Dart module settings.
    pub fn new_with_defaults() -> Self {
        Self::with_dart_settings(DartModuleSettings::default())
    }

    pub fn with_dart_settings(settings: DartModuleSettings) -> Self {
        let mut registry = Self::new();
        registry.register(ParseStage);
        registry.register(ValidateStage);
        registry.register(RenderDartStage::new(settings));
        registry.register(RenderSwiftStage);
        registry
    }

    /// Register a stage, replacing any stage with the same id.
    pub fn register<S: Stage + 'static>(&mut self, stage: S) {
        self.stages.insert(stage.id(), Arc::new(stage));
    }

    pub fn get(&self, id: StageId) -> Option<Arc<dyn Stage>> {
        self.stages.get(&id).cloned()
    }

    pub fn contains(&self, id: StageId) -> bool {
        self.stages.contains_key(&id)
    }

    /// Run one stage on a unit. A missing stage fails the unit.
    pub fn dispatch(&self, id: StageId, unit: BindingUnit) -> StageResult {
        match self.stages.get(&id) {
            Some(stage) => {
                tracing::debug!(unit = %unit.name, stage = stage.name(), "running stage");
                stage.process(unit)
            }
            None => StageResult::failed(unit, format!("stage '{}' is not registered", id.name())),
        }
    }

    /// Drive a unit from `Parse` until a stage returns no requests.
    ///
    /// Follow-up requests are handled in stage order.
    pub fn run_to_completion(&self, unit: BindingUnit) -> BindingUnit {
        let mut queue = vec![StageId::Parse];
        let mut unit = unit;

        while let Some(next) = queue.iter().min().copied() {
            queue.retain(|id| *id != next);
            let result = self.dispatch(next, unit);
            unit = result.unit;
            if unit.is_failed() {
                break;
            }
            queue.extend(result.requests);
        }
        unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = StageRegistry::new_with_defaults();

        assert!(registry.contains(StageId::Parse));
        assert!(registry.contains(StageId::Validate));
        assert!(registry.contains(StageId::RenderDart));
        assert!(registry.contains(StageId::RenderSwift));
        assert!(!StageRegistry::new().contains(StageId::Parse));
    }

    #[test]
    fn test_registry_get() {
        let registry = StageRegistry::new_with_defaults();

        let stage = registry.get(StageId::RenderDart).unwrap();
        assert_eq!(stage.id(), StageId::RenderDart);
        assert_eq!(stage.name(), "render_dart");
    }

    #[test]
    fn test_run_to_completion() {
        let registry = StageRegistry::new_with_defaults();
        let unit = BindingUnit::new(
            "simple",
            include_str!("../../fixtures/prims_strings_binding.h"),
        );

        let unit = registry.run_to_completion(unit);
        assert!(!unit.is_failed(), "{:?}", unit.error);
        assert_eq!(unit.stage_num, 3);
        assert_eq!(unit.accessors.len(), 1);
        assert!(unit.dart.is_some());
        assert!(unit.swift.is_none());
    }

    #[test]
    fn test_missing_stage_fails_unit() {
        let mut registry = StageRegistry::new();
        registry.register(ParseStage);

        let unit = registry.run_to_completion(BindingUnit::new(
            "two",
            include_str!("../../fixtures/two_structs_binding.h"),
        ));
        assert_eq!(unit.error.as_deref(), Some("stage 'validate' is not registered"));
    }
}
