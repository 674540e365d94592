//! RenderDart and RenderSwift stages.

use super::traits::{Stage, StageId, StageResult};
use super::unit::BindingUnit;
use crate::binding::{render_swift_calls, BuildTarget, DartGenerator, Project};

/// Settings for the generated Dart module.
#[derive(Debug, Clone)]
pub struct DartModuleSettings {
    pub ffigen_binding: String,
    pub path_to_target: String,
    pub lib_name: String,
    pub target: BuildTarget,
    pub project: Project,
}

impl Default for DartModuleSettings {
    fn default() -> Self {
        Self {
            ffigen_binding: "./ffigen_binding.dart".to_string(),
            path_to_target: "target".to_string(),
            lib_name: "libdartbind".to_string(),
            target: BuildTarget::Debug,
            project: Project::Dart,
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderDartStage {
    settings: DartModuleSettings,
}

impl RenderDartStage {
    pub fn new(settings: DartModuleSettings) -> Self {
        Self { settings }
    }
}

impl Stage for RenderDartStage {
    fn id(&self) -> StageId {
        StageId::RenderDart
    }

    fn process(&self, mut unit: BindingUnit) -> StageResult {
        let Some(bindings) = unit.bindings.as_ref() else {
            return StageResult::failed(unit, "render_dart requires a parsed header");
        };

        let dart = DartGenerator {
            ffigen_binding: &self.settings.ffigen_binding,
            path_to_target: &self.settings.path_to_target,
            lib_name: &self.settings.lib_name,
            bindings,
            target: &self.settings.target,
            project: &self.settings.project,
        }
        .generate();

        unit.dart = Some(dart);
        unit.advance_stage();

        // Only Flutter plugins ship Swift sources that need the dummy calls.
        match self.settings.project {
            Project::Flutter(_) => StageResult::with_requests(unit, vec![StageId::RenderSwift]),
            Project::Dart => StageResult::terminal(unit),
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderSwiftStage;

impl Stage for RenderSwiftStage {
    fn id(&self) -> StageId {
        StageId::RenderSwift
    }

    fn process(&self, mut unit: BindingUnit) -> StageResult {
        let Some(bindings) = unit.bindings.as_ref() else {
            return StageResult::failed(unit, "render_swift requires a parsed header");
        };

        unit.swift = Some(render_swift_calls(bindings));
        unit.advance_stage();
        StageResult::terminal(unit)
    }
}
