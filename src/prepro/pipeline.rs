//! Sequential batch execution of the directive stages
//!
//! The pipeline applies each configured stage, in order, to the *entire*
//! batch before moving to the next stage. This batch-at-a-time staging is
//! load-bearing: a macro defined while a stage processes file A must be
//! visible when the same stage later processes file B.
//!
//! After the last stage each unit's surviving lines are joined into one
//! output string per root file, in input order. Failure is atomic: the
//! first stage error aborts the run with no output.

use crate::prepro::error::PpError;
use crate::prepro::plugins::{standard_plugins, DirectivePlugin, RunContext};
use crate::prepro::source::SourceUnit;

pub struct Preprocessor {
    plugins: Vec<Box<dyn DirectivePlugin>>,
}

impl Preprocessor {
    /// Pipeline with the fixed standard stage order.
    pub fn standard() -> Self {
        Preprocessor {
            plugins: standard_plugins(),
        }
    }

    /// Pipeline with a caller-supplied stage list, for embedders that need
    /// a different (or reduced) stage set.
    pub fn with_plugins(plugins: Vec<Box<dyn DirectivePlugin>>) -> Self {
        Preprocessor { plugins }
    }

    /// Stage names in execution order.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every stage over the batch and render one output string per
    /// root unit.
    pub fn run(
        &self,
        mut units: Vec<SourceUnit>,
        ctx: &mut RunContext<'_, '_>,
    ) -> Result<Vec<String>, PpError> {
        for plugin in &self.plugins {
            units = plugin.run(units, ctx)?;
        }
        Ok(units.iter().map(SourceUnit::render).collect())
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::standard()
    }
}
