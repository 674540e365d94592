//! FFI accessors for `Simple`.

use super::types::{bytes_from_raw, BindStatus};
use crate::model::Simple;
use libc::c_char;
use std::ffi::CStr;

/// FFI access methods generated for struct 'Simple'.
///
/// Below is the dart extension to call those methods.
///
/// ```dart
/// extension Rid_ExtOnPointerRawSimple on dart_ffi.Pointer<ffigen_bind.RawSimple> {
/// @dart_ffi.Int32() int get prim_u8 => rid_ffi.rid_simple_prim_u8(this);
/// @dart_ffi.Int32() int get prim_u16 => rid_ffi.rid_simple_prim_u16(this);
/// @dart_ffi.Int64() int get prim_u64 => rid_ffi.rid_simple_prim_u64(this);
/// String get cstring {
///   int len = rid_ffi.rid_simple_cstring_len(this);
///   return rid_ffi.rid_simple_cstring(this).toDartString(len);
/// }
/// String get string {
///   int len = rid_ffi.rid_simple_string_len(this);
///   return rid_ffi.rid_simple_string(this).toDartString(len);
/// }
/// bool get f => rid_ffi.rid_simple_f(this) != 0;
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn rid_simple_prim_u8(ptr: *mut Simple) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).prim_u8
}

#[no_mangle]
pub unsafe extern "C" fn rid_simple_prim_u16(ptr: *mut Simple) -> u16 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).prim_u16
}

#[no_mangle]
pub unsafe extern "C" fn rid_simple_prim_u64(ptr: *mut Simple) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).prim_u64
}

/// Pointer to the bytes of `cstring`; read exactly `rid_simple_cstring_len` bytes.
///
/// # Safety
/// The pointer is valid until the struct is freed.
#[no_mangle]
pub unsafe extern "C" fn rid_simple_cstring(ptr: *mut Simple) -> *const c_char {
    if ptr.is_null() {
        return std::ptr::null();
    }
    (*ptr).cstring.as_ptr()
}

#[no_mangle]
pub unsafe extern "C" fn rid_simple_cstring_len(ptr: *mut Simple) -> usize {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).cstring_bytes().len()
}

/// Pointer to the bytes of `string`. Not NUL-terminated.
///
/// # Safety
/// The pointer is valid until the struct is freed.
#[no_mangle]
pub unsafe extern "C" fn rid_simple_string(ptr: *mut Simple) -> *const c_char {
    if ptr.is_null() {
        return std::ptr::null();
    }
    (*ptr).string.as_ptr() as *const c_char
}

#[no_mangle]
pub unsafe extern "C" fn rid_simple_string_len(ptr: *mut Simple) -> usize {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).string_bytes().len()
}

#[no_mangle]
pub unsafe extern "C" fn rid_simple_f(ptr: *mut Simple) -> bool {
    if ptr.is_null() {
        return false;
    }
    (*ptr).f
}

/// Create a new `Simple`.
///
/// `cstring` must be NUL-terminated. `string` is read as `string_len` bytes.
///
/// # Safety
/// All pointers must be valid. Free the result with `rid_free_Simple`.
#[no_mangle]
pub unsafe extern "C" fn rid_simple_new(
    prim_u8: u8,
    prim_u16: u16,
    prim_u64: u64,
    cstring: *const c_char,
    string: *const c_char,
    string_len: usize,
    f: bool,
    out_handle: *mut *mut Simple,
) -> BindStatus {
    if cstring.is_null() || (string.is_null() && string_len > 0) || out_handle.is_null() {
        return BindStatus::NullPointer;
    }

    let cstring = match CStr::from_ptr(cstring).to_str() {
        Ok(s) => s.as_bytes().to_vec(),
        Err(_) => return BindStatus::InvalidUtf8,
    };
    let string = match std::str::from_utf8(bytes_from_raw(string, string_len)) {
        Ok(s) => s.to_string(),
        Err(_) => return BindStatus::InvalidUtf8,
    };

    // `CStr` already stops at the first NUL, so this cannot fail on interior NULs.
    match Simple::new(prim_u8, prim_u16, prim_u64, cstring, string, f) {
        Ok(simple) => {
            *out_handle = Box::into_raw(Box::new(simple));
            BindStatus::Ok
        }
        Err(_) => BindStatus::InteriorNul,
    }
}

/// Free a `Simple`.
///
/// # Safety
/// Pointer must be valid or null.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn rid_free_Simple(ptr: *mut Simple) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}
