//! Assembles the Dart module that loads the native library and exposes the
//! extensions carried by the header.

use super::constants::{
    DART_ASYNC, DART_COLLECTION, DART_FFI, FFI_GEN_BIND, FFI_NATIVE_LIBRARY_NAME, PACKAGE_FFI,
    RID_FFI, STRING_TO_NATIVE_INT8,
};
use super::parsed::ParsedBindings;
use super::project::{BuildTarget, Project};

/// Strings read through accessors are borrowed from their struct, so the
/// helper only converts and never frees.
fn dart_string_from_pointer() -> String {
    format!(
        r###"
extension Rid_ExtOnPointerInt8 on {dart_ffi}.Pointer<{dart_ffi}.Int8> {{
  String toDartString([int? len]) {{
    final {dart_ffi}.Pointer<{pack_ffi}.Utf8> stringPtr = this.cast();
    return stringPtr.toDartString(length: len);
  }}
}}
"###,
        dart_ffi = DART_FFI,
        pack_ffi = PACKAGE_FFI,
    )
}

fn dart_string_pointer_from_string() -> String {
    format!(
        r###"
extension Rid_ExtOnString on String {{
  {dart_ffi}.Pointer<{dart_ffi}.Int8> {to_native}() {{
    final {dart_ffi}.Pointer<{dart_ffi}.Int8> stringPtr =
        this.toNativeUtf8().cast();
    return stringPtr;
  }}
}}
"###,
        dart_ffi = DART_FFI,
        to_native = STRING_TO_NATIVE_INT8,
    )
}

/// Generates the `rid_generated.dart` module for one header.
pub struct DartGenerator<'a> {
    /// Relative path from the generated module to the ffigen bindings.
    pub ffigen_binding: &'a str,

    /// Path to the `target` directory the library is loaded from.
    pub path_to_target: &'a str,

    /// Name of the native library, i.e. `libdartbind`.
    pub lib_name: &'a str,

    pub bindings: &'a ParsedBindings,

    pub target: &'a BuildTarget,

    pub project: &'a Project,
}

impl<'a> DartGenerator<'a> {
    pub fn generate(&self) -> String {
        format!(
            r###"// ignore_for_file:unused_import, unused_element
{imports}
// Forwarding dart_ffi types essential to access raw Rust structs
export 'dart:ffi' show Pointer;

// Forwarding Dart Types for raw Rust structs
{struct_exports}
//
// Open Dynamic Library
//
{open_dl}
final {ffigen_bind}.{native_library} {rid_ffi} = {ffigen_bind}.{native_library}(_open());

//
// Extensions to provide an API for FFI calls into Rust
//
{extensions}
{string_from_pointer}{string_pointer_from_string}"###,
            imports = self.dart_imports(),
            struct_exports = self.dart_rust_type_reexports(),
            open_dl = self.dart_open_dl(),
            ffigen_bind = FFI_GEN_BIND,
            native_library = FFI_NATIVE_LIBRARY_NAME,
            rid_ffi = RID_FFI,
            extensions = self.bindings.dart_code(),
            string_from_pointer = dart_string_from_pointer(),
            string_pointer_from_string = dart_string_pointer_from_string(),
        )
    }

    fn dart_imports(&self) -> String {
        let project_specific_imports = match self.project {
            Project::Dart => "",
            Project::Flutter(_) => "import 'package:flutter/foundation.dart' as Foundation;\n",
        };
        format!(
            r###"import 'dart:ffi' as {dart_ffi};
import 'dart:async' as {dart_async};
import 'dart:io' as dart_io;
import 'dart:collection' as {dart_collection};
import 'package:ffi/ffi.dart' as {pack_ffi};
import '{ffigen_binding}' as {ffigen_bind};
{project_specific_imports}"###,
            dart_ffi = DART_FFI,
            dart_async = DART_ASYNC,
            dart_collection = DART_COLLECTION,
            pack_ffi = PACKAGE_FFI,
            ffigen_binding = self.ffigen_binding,
            ffigen_bind = FFI_GEN_BIND,
            project_specific_imports = project_specific_imports,
        )
    }

    fn dart_open_dl(&self) -> String {
        let sub = self.target.sub_folder();
        let mobile = match self.project {
            Project::Dart => String::new(),
            Project::Flutter(_) => format!(
                r###"  if (dart_io.Platform.isAndroid)
    return {dart_ffi}.DynamicLibrary.open('{lib_name}.so');
  if (dart_io.Platform.isIOS)
    return {dart_ffi}.DynamicLibrary.executable();
"###,
                dart_ffi = DART_FFI,
                lib_name = self.lib_name,
            ),
        };
        format!(
            r###"{dart_ffi}.DynamicLibrary _open() {{
{mobile}  if (dart_io.Platform.isLinux)
    return {dart_ffi}.DynamicLibrary.open('{path_to_target}/{sub}/{lib_name}.so');
  if (dart_io.Platform.isMacOS)
    return {dart_ffi}.DynamicLibrary.open('{path_to_target}/{sub}/{lib_name}.dylib');
  if (dart_io.Platform.isWindows)
    return {dart_ffi}.DynamicLibrary.open('{path_to_target}\\{win_sub}\\{lib_name}.dll');
  throw UnsupportedError(
      'Platform "${{dart_io.Platform.operatingSystem}}" is not supported.');
}}
"###,
            dart_ffi = DART_FFI,
            mobile = mobile,
            path_to_target = self.path_to_target,
            sub = sub,
            win_sub = sub.replace('/', r"\\"),
            lib_name = self.lib_name,
        )
    }

    /// Re-exports the renamed opaque structs generated by ffigen.
    fn dart_rust_type_reexports(&self) -> String {
        let types = self.bindings.renamed_structs();
        if types.is_empty() {
            String::new()
        } else {
            format!(
                "export '{}' show {};\n",
                self.ffigen_binding,
                types.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::project::FlutterConfig;

    fn bindings() -> ParsedBindings {
        ParsedBindings::parse(include_str!("../../fixtures/two_structs_binding.h")).unwrap()
    }

    fn generate(project: &Project, target: &BuildTarget) -> String {
        let bindings = bindings();
        DartGenerator {
            ffigen_binding: "./ffigen_binding.dart",
            path_to_target: "target",
            lib_name: "libdartbind",
            bindings: &bindings,
            target,
            project,
        }
        .generate()
    }

    #[test]
    fn test_dart_module_contents() {
        let module = generate(&Project::Dart, &BuildTarget::Debug);

        assert!(module.contains("import './ffigen_binding.dart' as ffigen_bind;"));
        assert!(module.contains("export './ffigen_binding.dart' show RawBar, RawFoo;"));
        assert!(module.contains("DynamicLibrary.open('target/debug/libdartbind.so')"));
        assert!(module.contains(r"target\\debug\\libdartbind.dll"));
        assert!(module.contains(&bindings().dart_code()));
        assert!(module.contains("extension Rid_ExtOnPointerInt8"));
        assert!(module.contains("toNativeInt8()"));
        assert!(!module.contains("isAndroid"));
    }

    #[test]
    fn test_flutter_module_loads_mobile_libraries() {
        let project = Project::Flutter(FlutterConfig {
            plugin_name: "plugin".to_string(),
        });
        let module = generate(&project, &BuildTarget::DebugExample("demo".to_string()));

        assert!(module.contains("package:flutter/foundation.dart"));
        assert!(module.contains("DynamicLibrary.open('libdartbind.so')"));
        assert!(module.contains("DynamicLibrary.executable()"));
        assert!(module.contains("target/debug/examples/libdartbind.dylib"));
        assert!(module.contains(r"target\\debug\\examples\\libdartbind.dll"));
    }

    #[test]
    fn test_own_module_only_calls_exported_functions() {
        let header = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/include/dartbind.h"));
        let bindings = ParsedBindings::parse(header).unwrap();
        let module = DartGenerator {
            ffigen_binding: "./ffigen_binding.dart",
            path_to_target: "target",
            lib_name: "libdartbind",
            bindings: &bindings,
            target: &BuildTarget::Debug,
            project: &Project::Dart,
        }
        .generate();

        let prefix = format!("{}.", RID_FFI);
        let called: Vec<&str> = module
            .match_indices(&prefix)
            .map(|(idx, _)| {
                let rest = &module[idx + prefix.len()..];
                let end = rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                &rest[..end]
            })
            .collect();

        assert!(!called.is_empty());
        for name in called {
            assert!(bindings.function(name).is_some(), "{} is not exported", name);
        }
        for renamed in bindings.renamed_structs() {
            assert!(module.contains(&format!("ffigen_bind.{}>", renamed)), "{}", renamed);
        }
    }
}
