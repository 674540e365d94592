//! dartbind - Rust structs exposed to Dart through a C ABI.
//!
//! This crate provides:
//!
//! - Native structs (`Simple`, `Foo`, `Bar`, `Baz`) behind opaque pointers
//! - `extern "C"` accessors with the Dart extensions embedded in their docs
//! - Post-processing of the cbindgen header into Dart and Swift sources
//! - A stage pipeline that validates batches of headers, sync or in parallel
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     FFI Layer (dartbind.h)          │
//! │  rid_* accessors, constructors      │
//! └─────────────────────────────────────┘
//!                   │ cbindgen
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │        Binding Post-Processor       │
//! │  ┌───────────┐  ┌───────────────┐  │
//! │  │ Scheduler │  │ Stage System  │  │
//! │  │ (Priority)│  │ (Trait-based) │  │
//! │  └───────────┘  └───────────────┘  │
//! │  ┌───────────┐  ┌───────────────┐  │
//! │  │   Rayon   │  │    Tokio      │  │
//! │  │   Pool    │  │   Workers     │  │
//! │  └───────────┘  └───────────────┘  │
//! └─────────────────────────────────────┘
//! ```
//!
//! # FFI Usage
//!
//! ```c
//! Baz *baz;
//! if (rid_baz_new("hello", 5, &baz) == Ok) {
//!     const char *name = rid_baz_name(baz);
//!     uintptr_t len = rid_baz_name_len(baz);
//!     rid_free_Baz(baz);
//! }
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod stage;

pub use binding::{validate, ParsedBindings, StructAccessors};
pub use config::BuildConfig;
pub use error::{BindingError, Result};
pub use model::{Bar, Baz, Foo, Simple};
pub use runtime::{PriorityScheduler, Runtime, RuntimeConfig};
pub use stage::{BindingUnit, Stage, StageId, StageRegistry, StageResult};

pub use ffi::simple::*;
pub use ffi::structs::*;
pub use ffi::types::*;
