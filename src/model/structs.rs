//! Structs used by the multi-struct bindings.

use super::cstring_field;
use crate::error::Result;
use std::ffi::CString;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Foo {
    pub prim_u8: u8,
    pub prim_u16: u16,
}

impl Foo {
    pub fn new(prim_u8: u8, prim_u16: u16) -> Self {
        Self { prim_u8, prim_u16 }
    }
}

/// Carries a single flag, read as an integer on the Dart side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bar {
    pub f: bool,
}

impl Bar {
    pub fn new(f: bool) -> Self {
        Self { f }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Baz {
    pub name: CString,
}

impl Baz {
    /// Create a new `Baz`, failing when `name` contains a NUL byte.
    pub fn new(name: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self {
            name: cstring_field("name", name)?,
        })
    }

    #[inline]
    pub fn name_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baz_name() {
        let baz = Baz::new("baz").unwrap();
        assert_eq!(baz.name_bytes(), b"baz");
        assert_eq!(baz.name_bytes().len(), 3);
    }

    #[test]
    fn test_baz_rejects_nul() {
        assert!(Baz::new(vec![b'a', 0, b'b']).is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Foo::default(), Foo::new(0, 0));
        assert!(!Bar::default().f);
    }
}
