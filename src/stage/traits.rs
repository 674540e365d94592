//! Stage trait definitions.

use super::unit::BindingUnit;

/// Identifier for a stage type, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageId {
    /// Read structs, declarations and Dart sections from the header.
    Parse,
    /// Check the accessor invariants.
    Validate,
    /// Render the Dart module.
    RenderDart,
    /// Render the Swift dummy calls.
    RenderSwift,
}

impl StageId {
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Parse => "parse",
            StageId::Validate => "validate",
            StageId::RenderDart => "render_dart",
            StageId::RenderSwift => "render_swift",
        }
    }
}

/// Result of executing a stage.
pub struct StageResult {
    /// The processed unit.
    pub unit: BindingUnit,
    /// Stages to run next.
    pub requests: Vec<StageId>,
}

impl StageResult {
    /// Create a result with no follow-up stages (terminal).
    pub fn terminal(unit: BindingUnit) -> Self {
        Self {
            unit,
            requests: Vec::new(),
        }
    }

    /// Create a result with follow-up stages.
    pub fn with_requests(unit: BindingUnit, requests: Vec<StageId>) -> Self {
        Self { unit, requests }
    }

    /// Terminal result for a unit that failed with `error`.
    pub fn failed(mut unit: BindingUnit, error: impl ToString) -> Self {
        unit.fail(error);
        Self::terminal(unit)
    }
}

/// Trait for processing stages.
pub trait Stage: Send + Sync {
    fn id(&self) -> StageId;

    /// Process a unit through this stage.
    fn process(&self, unit: BindingUnit) -> StageResult;

    fn name(&self) -> &'static str {
        self.id().name()
    }
}
