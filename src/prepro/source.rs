//! Source units and the content-provider seam
//!
//! A [`SourceUnit`] is an immutable ordered sequence of tagged lines
//! representing one file. Stages never mutate a unit in place; each stage
//! produces new units, so every surviving line keeps the (path, line number)
//! tag of the file it originally came from. That tag is what makes error
//! messages point at real source even after inclusion and joining.
//!
//! Text is split on `'\n'` keeping the final empty segment, so a file
//! ending in a newline renders back with that newline: a directive-free
//! unit round-trips byte-exact.
//!
//! The pipeline reaches the outside world through [`ContentProvider`], a
//! single-operation capability: "get the lines for a path". Disk-backed,
//! in-memory, and overlay implementations are provided; the pipeline itself
//! never touches a concrete storage mechanism.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// One physical line tagged with the file it originated from and the
/// 1-based number it had there. Included lines keep the included file's
/// path and numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub path: String,
    pub number: u32,
    pub text: String,
}

impl SourceLine {
    pub fn new(path: impl Into<String>, number: u32, text: impl Into<String>) -> Self {
        SourceLine {
            path: path.into(),
            number,
            text: text.into(),
        }
    }
}

/// An ordered sequence of tagged lines from one file.
///
/// Invariant: line numbers are monotonically non-decreasing within a unit
/// relative to their originating file; `path` is the root file the unit
/// stands for, while each line's own `path` names where it really came
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: String,
    pub lines: Vec<SourceLine>,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>, lines: Vec<SourceLine>) -> Self {
        SourceUnit {
            path: path.into(),
            lines,
        }
    }

    /// Build a unit from raw text, numbering physical lines from 1 and
    /// tagging each with this unit's path. The final empty segment of
    /// newline-terminated text becomes a trailing empty line, so `render`
    /// reproduces the input exactly.
    pub fn from_text(path: impl Into<String>, text: &str) -> Self {
        let path = path.into();
        let lines = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| SourceLine::new(path.clone(), i as u32 + 1, line))
            .collect();
        SourceUnit { path, lines }
    }

    /// Join the surviving lines into the unit's final output string.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Capability to resolve a path to file content.
///
/// This is the only seam between the pipeline and storage. `None` means the
/// path cannot be resolved; the include stage turns that into an
/// `UnresolvedInclude` error at the directive's location. Implementations
/// split on `'\n'` keeping the final empty segment, so content is lossless.
pub trait ContentProvider {
    fn lines(&self, path: &str) -> Option<Vec<String>>;
}

fn split_lossless(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// In-memory provider backed by a path → text map. Used by tests and by
/// embedders that already hold their sources.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), text.into());
        self
    }
}

impl ContentProvider for MemorySource {
    fn lines(&self, path: &str) -> Option<Vec<String>> {
        self.files.get(path).map(|text| split_lossless(text))
    }
}

/// Disk-backed provider resolving paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct DiskSource {
    root: PathBuf,
}

impl DiskSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskSource { root: root.into() }
    }
}

impl ContentProvider for DiskSource {
    fn lines(&self, path: &str) -> Option<Vec<String>> {
        let full = self.root.join(path);
        fs::read_to_string(full).ok().map(|text| split_lossless(&text))
    }
}

/// Per-run overlay of generated units over a base provider.
///
/// The fake-generics stage registers instantiated templates here under their
/// mangled names; the include stage consults the overlay before falling back
/// to the base provider.
pub struct OverlaySource<'a> {
    base: &'a dyn ContentProvider,
    generated: HashMap<String, Vec<String>>,
}

impl<'a> OverlaySource<'a> {
    pub fn new(base: &'a dyn ContentProvider) -> Self {
        OverlaySource {
            base,
            generated: HashMap::new(),
        }
    }

    pub fn register(&mut self, path: impl Into<String>, lines: Vec<String>) {
        self.generated.insert(path.into(), lines);
    }

    pub fn contains_generated(&self, path: &str) -> bool {
        self.generated.contains_key(path)
    }
}

impl ContentProvider for OverlaySource<'_> {
    fn lines(&self, path: &str) -> Option<Vec<String>> {
        if let Some(lines) = self.generated.get(path) {
            return Some(lines.clone());
        }
        self.base.lines(path)
    }
}
