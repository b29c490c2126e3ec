//! Preprocessor core
//!
//! Layout:
//!
//! - `source`       Source units, lines, and the content-provider seam
//! - `defines`      Macro table and per-run settings
//! - `diagnostics`  Non-fatal diagnostic reporting (`#warning`)
//! - `error`        Stage errors and the facade-level wrapper
//! - `directive`    Directive line recognition
//! - `plugins`      The five directive stages
//! - `pipeline`     Sequential batch execution of the stages
//! - `api`          High-level entry points (fresh state per call)
//!
//! The general flow is `api` → `pipeline` → each stage in `plugins`, with
//! every stage consuming the whole batch produced by the previous one.

pub mod api;
pub mod defines;
pub mod diagnostics;
pub mod directive;
pub mod error;
pub mod pipeline;
pub mod plugins;
pub mod source;

pub use api::{preprocess, preprocess_with};
pub use defines::{MacroTable, RunSettings};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, StderrSink};
pub use error::{PpError, PpErrorKind, PreprocessError};
pub use pipeline::Preprocessor;
pub use source::{ContentProvider, DiskSource, MemorySource, OverlaySource, SourceLine, SourceUnit};
