//! The directive stages
//!
//! Each stage is a value implementing [`DirectivePlugin`]: it consumes the
//! whole batch of source units plus the shared run context and produces a
//! new batch (or fails the run). Stages are assembled into an explicit,
//! statically-typed ordered list at configuration time; there is no runtime
//! discovery.
//!
//! The standard order is:
//!
//! 1. fake-generics — rewrite pseudo-generic includes to concrete ones
//! 2. include      — recursive include inlining with cycle detection
//! 3. conditional  — `#if*`/`#else`/`#endif` (and gated `#define`/`#undef`)
//! 4. exception    — `#error` aborts, `#warning` reports
//! 5. multi-line   — join continuation-marked physical lines
//!
//! Continuation joining deliberately runs last: earlier stages see physical
//! lines, so a directive split across a continuation marker is not
//! recognized as a single directive.

pub mod conditional;
pub mod exception;
pub mod fake_generics;
pub mod include;
pub mod multiline;

pub use conditional::ConditionalPlugin;
pub use exception::ExceptionPlugin;
pub use fake_generics::{FakeGenericsPlugin, GenericInclude, TemplateExpander};
pub use include::IncludePlugin;
pub use multiline::MultiLinePlugin;

use crate::prepro::defines::{MacroTable, RunSettings};
use crate::prepro::diagnostics::DiagnosticSink;
use crate::prepro::error::PpError;
use crate::prepro::source::{OverlaySource, SourceUnit};

/// Mutable state shared by the stages of one pipeline run.
///
/// Owned by a single run and never shared between concurrent invocations;
/// the facade constructs a fresh context per call.
pub struct RunContext<'run, 'base> {
    pub settings: &'run RunSettings,
    pub macros: &'run mut MacroTable,
    pub sink: &'run mut (dyn DiagnosticSink + 'run),
    /// Include resolution: generated generic instantiations layered over
    /// the caller's content provider.
    pub includes: &'run mut OverlaySource<'base>,
    pub generics: &'run (dyn GenericInclude + 'run),
}

/// One named transformation stage over the whole batch.
pub trait DirectivePlugin {
    fn name(&self) -> &'static str;

    /// Transform the batch. A returned error aborts the run; no partial
    /// output survives.
    fn run(
        &self,
        units: Vec<SourceUnit>,
        ctx: &mut RunContext<'_, '_>,
    ) -> Result<Vec<SourceUnit>, PpError>;
}

/// The fixed standard stage list, in execution order.
pub fn standard_plugins() -> Vec<Box<dyn DirectivePlugin>> {
    vec![
        Box::new(FakeGenericsPlugin),
        Box::new(IncludePlugin),
        Box::new(ConditionalPlugin),
        Box::new(ExceptionPlugin),
        Box::new(MultiLinePlugin),
    ]
}
