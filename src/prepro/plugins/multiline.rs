//! Line continuation
//!
//! Joins any physical line ending in the continuation marker with the
//! following physical line, repeatedly, into one logical line carrying the
//! first line's (path, line) tag. A marker on a unit's last line joins with
//! nothing and is simply dropped.
//!
//! This stage runs last in the standard order, so every earlier stage
//! operates on physical lines.

use crate::prepro::error::PpError;
use crate::prepro::plugins::{DirectivePlugin, RunContext};
use crate::prepro::source::{SourceLine, SourceUnit};

pub struct MultiLinePlugin;

impl DirectivePlugin for MultiLinePlugin {
    fn name(&self) -> &'static str {
        "multi-line"
    }

    fn run(
        &self,
        units: Vec<SourceUnit>,
        ctx: &mut RunContext<'_, '_>,
    ) -> Result<Vec<SourceUnit>, PpError> {
        let marker = ctx.settings.continuation_marker;
        let output = units
            .into_iter()
            .map(|unit| {
                let mut lines: Vec<SourceLine> = Vec::with_capacity(unit.lines.len());
                let mut pending: Option<SourceLine> = None;
                for line in unit.lines {
                    match pending.take() {
                        None => {
                            if let Some(stripped) = strip_marker(&line.text, marker) {
                                pending = Some(SourceLine::new(line.path, line.number, stripped));
                            } else {
                                lines.push(line);
                            }
                        }
                        Some(mut joined) => {
                            if let Some(stripped) = strip_marker(&line.text, marker) {
                                joined.text.push_str(&stripped);
                                pending = Some(joined);
                            } else {
                                joined.text.push_str(&line.text);
                                lines.push(joined);
                            }
                        }
                    }
                }
                // Marker on the unit's last line: nothing to join with.
                if let Some(joined) = pending {
                    lines.push(joined);
                }
                SourceUnit::new(unit.path, lines)
            })
            .collect();
        Ok(output)
    }
}

fn strip_marker(text: &str, marker: char) -> Option<String> {
    text.strip_suffix(marker).map(str::to_string)
}
