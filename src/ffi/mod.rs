//! FFI (Foreign Function Interface) layer for C bindings.
//!
//! Every struct is opaque on the C side. Callers receive a pointer from a
//! constructor, read fields through `rid_<struct>_<field>` accessors and
//! release it with `rid_free_<Struct>`. String fields are exposed as a
//! pointer plus a `_len` accessor and are never NUL-terminated from the
//! caller's point of view.

pub mod simple;
pub mod structs;
pub mod types;

pub use simple::*;
pub use structs::*;
pub use types::*;
