//! High-level entry points
//!
//! The facade owns per-run state construction: a fresh macro table seeded
//! from the caller's initial definitions, a fresh include overlay, and a
//! fresh pipeline with the fixed standard stage order. Nothing is reused
//! across calls, so two concurrent preprocessing requests never observe
//! each other's macro state.
//!
//! It is also the single error-translation point: a stage's [`PpError`] is
//! wrapped into a [`PreprocessError`] naming the first root file of the
//! batch, with the original kind/path/line preserved as the cause.

use crate::prepro::defines::{MacroTable, RunSettings};
use crate::prepro::diagnostics::{DiagnosticSink, StderrSink};
use crate::prepro::error::{PpError, PpErrorKind, PreprocessError};
use crate::prepro::pipeline::Preprocessor;
use crate::prepro::plugins::{RunContext, TemplateExpander};
use crate::prepro::source::{ContentProvider, OverlaySource, SourceUnit};

/// Preprocess `roots` (resolved through `provider`) with default settings.
/// `#warning` diagnostics go to stderr. `defs` holds the initial macro
/// definitions; `None` is equivalent to an empty table.
pub fn preprocess(
    provider: &dyn ContentProvider,
    roots: &[&str],
    defs: Option<&MacroTable>,
) -> Result<Vec<String>, PreprocessError> {
    preprocess_with(
        provider,
        roots,
        defs,
        &RunSettings::default(),
        &mut StderrSink,
    )
}

/// Full-control variant: caller-supplied settings and diagnostic sink.
///
/// Returns one fully-expanded output string per root, in input order, or
/// the wrapped first error with no partial output.
pub fn preprocess_with(
    provider: &dyn ContentProvider,
    roots: &[&str],
    defs: Option<&MacroTable>,
    settings: &RunSettings,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<String>, PreprocessError> {
    let first_root = roots.first().copied().unwrap_or_default().to_string();
    let wrap = |err: PpError| PreprocessError::new(first_root.clone(), err);

    let mut units = Vec::with_capacity(roots.len());
    for path in roots {
        let content = provider.lines(path).ok_or_else(|| {
            wrap(PpError::new(
                PpErrorKind::UnresolvedInclude,
                format!("cannot read root file '{}'", path),
                *path,
                0,
            ))
        })?;
        units.push(SourceUnit::from_text(*path, &content.join("\n")));
    }

    let mut macros = MacroTable::seeded(defs);
    let mut overlay = OverlaySource::new(provider);
    let expander = TemplateExpander;
    let mut ctx = RunContext {
        settings,
        macros: &mut macros,
        sink,
        includes: &mut overlay,
        generics: &expander,
    };
    Preprocessor::standard().run(units, &mut ctx).map_err(wrap)
}
