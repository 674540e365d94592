//! Error type shared by the model, the binding post-processor and the CLI.

use std::path::PathBuf;

use crate::binding::validate::AccessorViolation;

#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("string field '{field}' contains an interior NUL byte at {position}")]
    InteriorNul {
        field: &'static str,
        position: usize,
    },

    #[error("dart section opened at line {line} is never closed")]
    UnterminatedDartSection {
        line: usize,
    },

    #[error("binding header violates {} accessor invariant(s): {}", .0.len(), join_violations(.0))]
    Validation(Vec<AccessorViolation>),

    #[error("unsupported host os '{0}'")]
    UnsupportedHost(String),

    #[error("'{command}' failed: {detail}")]
    Command {
        command: String,
        detail: String,
    },

    #[error("'{command}' timed out after {seconds}s")]
    Timeout {
        command: String,
        seconds: u64,
    },

    #[error("unable to start worker runtime: {0}")]
    Worker(#[source] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unable to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl BindingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BindingError::Io {
            path: path.into(),
            source,
        }
    }
}

fn join_violations(violations: &[AccessorViolation]) -> String {
    violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; ")
}

pub type Result<T> = std::result::Result<T, BindingError>;
