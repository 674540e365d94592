//! Unit of work flowing through the stages: one binding header.

use crate::binding::{ParsedBindings, StructAccessors};

/// A binding header and everything derived from it so far.
#[derive(Clone, Debug, Default)]
pub struct BindingUnit {
    /// Identifier, usually the header's file name.
    pub name: String,

    /// Raw header text.
    pub header: String,

    /// Number of stages this unit has passed.
    pub stage_num: u32,

    pub bindings: Option<ParsedBindings>,

    pub accessors: Vec<StructAccessors>,

    /// Rendered `rid_generated.dart` module.
    pub dart: Option<String>,

    /// Rendered Swift dummy calls.
    pub swift: Option<String>,

    /// Why processing stopped, if it failed.
    pub error: Option<String>,
}

impl BindingUnit {
    pub fn new(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: header.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    #[inline]
    pub fn advance_stage(&mut self) {
        self.stage_num += 1;
    }

    pub fn fail(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
    }
}
