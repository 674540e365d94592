//! C-compatible type definitions for FFI.

/// Result status codes for FFI constructors.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer was passed.
    NullPointer = 1,
    /// Invalid UTF-8 string.
    InvalidUtf8 = 2,
    /// String contains an interior NUL byte.
    InteriorNul = 3,
}

/// Borrow `len` bytes starting at `data` as a slice.
///
/// # Safety
/// `data` must be valid for `len` bytes, or `len` must be 0.
pub(crate) unsafe fn bytes_from_raw<'a>(data: *const libc::c_char, len: usize) -> &'a [u8] {
    if len == 0 {
        return &[];
    }
    std::slice::from_raw_parts(data as *const u8, len)
}
