//! Macro table and per-run settings
//!
//! The macro table is the only mutable state shared across files in a batch:
//! a macro defined while the conditional stage processes file A is visible
//! when the same stage later processes file B. It is constructed fresh per
//! pipeline invocation and never shared between runs.
//!
//! It doubles as the initial-definitions type at the facade boundary and
//! (de)serializes transparently as a plain name → value object, which is
//! what the CLI's `--defs` JSON file contains.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Case-sensitive mapping from macro name to an optional value.
///
/// Absence of a key means "undefined"; a present key with `None` is a
/// defined, valueless flag. Conditional evaluation only cares about
/// presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacroTable {
    entries: HashMap<String, Option<String>>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fresh table from caller-supplied initial definitions. `None`
    /// is equivalent to an empty table.
    pub fn seeded(defs: Option<&MacroTable>) -> Self {
        defs.cloned().unwrap_or_default()
    }

    pub fn define(&mut self, name: impl Into<String>, value: Option<String>) {
        self.entries.insert(name.into(), value);
    }

    pub fn undefine(&mut self, name: &str) {
        self.entries.remove(name);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Behavior flags for one pipeline run. Immutable for the run's duration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Whether the conditional stage recognizes in-stream `#define`/`#undef`.
    pub allow_inline_define: bool,
    /// Trailing marker joining a physical line with its successor.
    pub continuation_marker: char,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            allow_inline_define: false,
            continuation_marker: '\\',
        }
    }
}
