//! Stage system for the header processing pipeline.

pub mod parse;
pub mod registry;
pub mod render;
pub mod traits;
pub mod unit;

pub use parse::{ParseStage, ValidateStage};
pub use registry::StageRegistry;
pub use render::{DartModuleSettings, RenderDartStage, RenderSwiftStage};
pub use traits::{Stage, StageId, StageResult};
pub use unit::BindingUnit;
