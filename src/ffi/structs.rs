//! FFI accessors for `Foo`, `Bar` and `Baz`.

use super::types::{bytes_from_raw, BindStatus};
use crate::model::{Bar, Baz, Foo};
use libc::c_char;

/// FFI access methods generated for struct 'Foo'.
///
/// Below is the dart extension to call those methods.
///
/// ```dart
/// extension Rid_ExtOnPointerRawFoo on dart_ffi.Pointer<ffigen_bind.RawFoo> {
/// @dart_ffi.Int32() int get prim_u8 => rid_ffi.rid_foo_prim_u8(this);
/// @dart_ffi.Int32() int get prim_u16 => rid_ffi.rid_foo_prim_u16(this);
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn rid_foo_prim_u8(ptr: *mut Foo) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).prim_u8
}

#[no_mangle]
pub unsafe extern "C" fn rid_foo_prim_u16(ptr: *mut Foo) -> u16 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).prim_u16
}

#[no_mangle]
pub extern "C" fn rid_foo_new(prim_u8: u8, prim_u16: u16) -> *mut Foo {
    Box::into_raw(Box::new(Foo::new(prim_u8, prim_u16)))
}

/// # Safety
/// Pointer must be valid or null.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn rid_free_Foo(ptr: *mut Foo) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// FFI access methods generated for struct 'Bar'.
///
/// Below is the dart extension to call those methods.
///
/// ```dart
/// extension Rid_ExtOnPointerRawBar on dart_ffi.Pointer<ffigen_bind.RawBar> {
/// bool get f => rid_ffi.rid_bar_f(this) != 0;
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn rid_bar_f(ptr: *mut Bar) -> bool {
    if ptr.is_null() {
        return false;
    }
    (*ptr).f
}

#[no_mangle]
pub extern "C" fn rid_bar_new(f: bool) -> *mut Bar {
    Box::into_raw(Box::new(Bar::new(f)))
}

/// # Safety
/// Pointer must be valid or null.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn rid_free_Bar(ptr: *mut Bar) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// FFI access methods generated for struct 'Baz'.
///
/// Below is the dart extension to call those methods.
///
/// ```dart
/// extension Rid_ExtOnPointerRawBaz on dart_ffi.Pointer<ffigen_bind.RawBaz> {
/// String get name {
///   int len = rid_ffi.rid_baz_name_len(this);
///   return rid_ffi.rid_baz_name(this).toDartString(len);
/// }
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn rid_baz_name(ptr: *mut Baz) -> *const c_char {
    if ptr.is_null() {
        return std::ptr::null();
    }
    (*ptr).name.as_ptr()
}

#[no_mangle]
pub unsafe extern "C" fn rid_baz_name_len(ptr: *mut Baz) -> usize {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).name_bytes().len()
}

/// Create a new `Baz` from `name_len` bytes at `name`.
///
/// # Safety
/// `name` must be valid for `name_len` bytes and `out_handle` must be valid.
#[no_mangle]
pub unsafe extern "C" fn rid_baz_new(
    name: *const c_char,
    name_len: usize,
    out_handle: *mut *mut Baz,
) -> BindStatus {
    if (name.is_null() && name_len > 0) || out_handle.is_null() {
        return BindStatus::NullPointer;
    }

    let bytes = bytes_from_raw(name, name_len);
    if std::str::from_utf8(bytes).is_err() {
        return BindStatus::InvalidUtf8;
    }

    match Baz::new(bytes.to_vec()) {
        Ok(baz) => {
            *out_handle = Box::into_raw(Box::new(baz));
            BindStatus::Ok
        }
        Err(_) => BindStatus::InteriorNul,
    }
}

/// # Safety
/// Pointer must be valid or null.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn rid_free_Baz(ptr: *mut Baz) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}
