//! Post-processing of the header cbindgen emits for the accessor surface.
//!
//! The header is the contract: it declares the opaque structs, the accessor
//! functions and, inside doc comments, the Dart extensions calling them.
//! This module reads it back, checks the accessor invariants and derives
//! the artifacts a Dart or Flutter project needs from it.

pub mod constants;
pub mod dart_module;
pub mod ffigen;
pub mod function_header;
pub mod parsed;
pub mod project;
pub mod swift;
pub mod validate;

pub use dart_module::DartGenerator;
pub use ffigen::{run_ffigen, HostProps, YamlConfig};
pub use function_header::{parse_function_header, CType, FunctionArg, FunctionHeader, Param};
pub use parsed::{DartSection, ParsedBindings};
pub use project::{BuildTarget, FlutterConfig, Project};
pub use swift::{inject_into, render_swift_calls, SwiftInjector};
pub use validate::{validate, Accessor, AccessorKind, AccessorViolation, StructAccessors};
