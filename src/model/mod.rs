//! Native structs exposed to Dart through opaque pointers.

pub mod simple;
pub mod structs;

pub use simple::Simple;
pub use structs::{Bar, Baz, Foo};

use crate::error::{BindingError, Result};
use std::ffi::CString;

/// Build a `CString` field value, rejecting interior NUL bytes.
pub(crate) fn cstring_field(field: &'static str, value: impl Into<Vec<u8>>) -> Result<CString> {
    CString::new(value).map_err(|e| BindingError::InteriorNul {
        field,
        position: e.nul_position(),
    })
}
