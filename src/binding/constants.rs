//! Identifiers shared between the header, the ffigen config and the generated Dart module.

/// Bindings generated by ffigen are imported into the Dart module under this id.
pub const FFI_GEN_BIND: &str = "ffigen_bind";

/// `dart:ffi` is imported under this id.
pub const DART_FFI: &str = "dart_ffi";

pub const DART_ASYNC: &str = "dart_async";

pub const DART_COLLECTION: &str = "dart_collection";

/// `package:ffi` is imported under this id.
pub const PACKAGE_FFI: &str = "package_ffi";

/// The raw FFI functions are reached through this id from the extensions.
pub const RID_FFI: &str = "rid_ffi";

/// Dart extension method converting a `String` to `Pointer<Int8>`.
pub const STRING_TO_NATIVE_INT8: &str = "toNativeInt8";

/// Class name ffigen generates for the native library.
pub const FFI_NATIVE_LIBRARY_NAME: &str = "NativeLibrary";

/// Prefix ffigen applies to every opaque struct it renames.
pub const RAW_STRUCT_PREFIX: &str = "Raw";

pub const GENERATED_DIR: &str = "generated";
pub const FFIGEN_BINDING_FILE: &str = "ffigen_binding.dart";
pub const RID_GENERATED_FILE: &str = "rid_generated.dart";
pub const C_BINDINGS_FILE: &str = "bindings.h";
pub const IOS_BINDINGS_FILE: &str = "binding.h";
