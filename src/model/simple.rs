//! Single struct mixing primitives, strings and a flag.

use super::cstring_field;
use crate::error::Result;
use std::ffi::CString;

/// Struct with one field of every accessor kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Simple {
    pub prim_u8: u8,
    pub prim_u16: u16,
    pub prim_u64: u64,

    /// NUL-terminated storage; accessors still report its length.
    pub cstring: CString,

    /// Not NUL-terminated, callers must use the length accessor.
    pub string: String,

    pub f: bool,
}

impl Simple {
    /// Create a new `Simple`.
    ///
    /// Fails when `cstring` contains an interior NUL byte.
    pub fn new(
        prim_u8: u8,
        prim_u16: u16,
        prim_u64: u64,
        cstring: impl Into<Vec<u8>>,
        string: impl Into<String>,
        f: bool,
    ) -> Result<Self> {
        Ok(Self {
            prim_u8,
            prim_u16,
            prim_u64,
            cstring: cstring_field("cstring", cstring)?,
            string: string.into(),
            f,
        })
    }

    /// Bytes of `cstring` without the trailing NUL.
    #[inline]
    pub fn cstring_bytes(&self) -> &[u8] {
        self.cstring.as_bytes()
    }

    #[inline]
    pub fn string_bytes(&self) -> &[u8] {
        self.string.as_bytes()
    }
}
