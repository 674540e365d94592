//! Accessor invariants of the opaque-pointer ABI.
//!
//! Accessors are functions taking a single `struct X *` and returning a
//! value. String accessors return `const char *` and must have a sibling
//! `<name>_len` returning `uintptr_t`, since the bytes are not
//! NUL-terminated from the caller's point of view.

use super::function_header::{CType, FunctionHeader};
use super::parsed::ParsedBindings;
use crate::error::{BindingError, Result};

const LEN_SUFFIX: &str = "_len";

/// What an accessor returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorKind {
    Primitive(CType),
    Bool,
    /// Pointer half of a `(pointer, length)` pair.
    String,
    /// Length half of a `(pointer, length)` pair.
    Length,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub function: String,
    /// Field name derived from the `rid_<struct>_` prefix.
    pub field: String,
    pub kind: AccessorKind,
}

/// Accessors grouped under the struct they read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructAccessors {
    pub struct_name: String,
    pub accessors: Vec<Accessor>,
}

impl StructAccessors {
    pub fn get(&self, function: &str) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.function == function)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.accessors
            .iter()
            .filter(|a| a.kind != AccessorKind::Length)
            .map(|a| a.field.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessorViolation {
    #[error("string accessor '{function}' has no '{function}_len' length accessor")]
    MissingLengthAccessor { function: String },

    #[error("length accessor '{function}' returns '{found}' instead of 'uintptr_t'")]
    LengthNotUintptr { function: String, found: String },

    #[error("accessor '{function}' reads from undeclared struct '{struct_name}'")]
    UnknownStruct {
        function: String,
        struct_name: String,
    },
}

/// Convert `FooBar` into `foo_bar`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (idx, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if idx > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Group accessor functions by struct, in order of first appearance.
pub fn collect_accessors(bindings: &ParsedBindings) -> Vec<StructAccessors> {
    let mut groups: Vec<StructAccessors> = Vec::new();

    let candidates: Vec<(&str, &FunctionHeader)> = bindings
        .functions
        .iter()
        .filter(|f| f.return_type != CType::Void)
        .filter_map(|f| f.receiver().map(|r| (r, f)))
        .collect();

    for (struct_name, function) in &candidates {
        let is_len_of_string = function
            .name
            .strip_suffix(LEN_SUFFIX)
            .map(|base| {
                candidates.iter().any(|(s, f)| {
                    s == struct_name && f.name == base && f.return_type == CType::CString
                })
            })
            .unwrap_or(false);

        // A `_len` sibling of a string accessor is a length whatever it returns;
        // `validate` reports a wrong return type.
        let kind = match &function.return_type {
            _ if is_len_of_string => AccessorKind::Length,
            CType::CString => AccessorKind::String,
            CType::Bool => AccessorKind::Bool,
            other => AccessorKind::Primitive(other.clone()),
        };

        let prefix = format!("rid_{}_", snake_case(struct_name));
        let field = function
            .name
            .strip_prefix(&prefix)
            .unwrap_or(&function.name)
            .to_string();

        let accessor = Accessor {
            function: function.name.clone(),
            field,
            kind,
        };

        match groups.iter_mut().find(|g| g.struct_name == *struct_name) {
            Some(group) => group.accessors.push(accessor),
            None => groups.push(StructAccessors {
                struct_name: struct_name.to_string(),
                accessors: vec![accessor],
            }),
        }
    }

    groups
}

/// Check every accessor invariant, reporting all violations at once.
pub fn validate(bindings: &ParsedBindings) -> Result<Vec<StructAccessors>> {
    let groups = collect_accessors(bindings);
    let mut violations = Vec::new();

    for group in &groups {
        if !bindings.has_struct(&group.struct_name) {
            for accessor in &group.accessors {
                violations.push(AccessorViolation::UnknownStruct {
                    function: accessor.function.clone(),
                    struct_name: group.struct_name.clone(),
                });
            }
        }

        for accessor in group.accessors.iter().filter(|a| a.kind == AccessorKind::String) {
            let len_name = format!("{}{}", accessor.function, LEN_SUFFIX);
            match bindings.function(&len_name) {
                Some(len) if len.return_type == CType::UIntPtr => {}
                Some(len) => violations.push(AccessorViolation::LengthNotUintptr {
                    function: len_name,
                    found: len.return_type.c_name(),
                }),
                None => violations.push(AccessorViolation::MissingLengthAccessor {
                    function: accessor.function.clone(),
                }),
            }
        }
    }

    if violations.is_empty() {
        Ok(groups)
    } else {
        for violation in &violations {
            tracing::warn!(%violation, "accessor invariant violated");
        }
        Err(BindingError::Validation(violations))
    }
}
