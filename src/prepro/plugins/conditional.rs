//! Conditional compilation
//!
//! A stack-based state machine over `#if NAME` / `#ifdef NAME` /
//! `#ifndef NAME` / `#else` / `#endif`. A line survives only while the
//! innermost open frame and all of its ancestors are in their taken branch.
//! Recognized directive lines are always stripped, taken branch or not.
//!
//! With `allow_inline_define` set, the stage also applies `#define` and
//! `#undef` in line order, only inside taken branches. The macro table is
//! shared across the whole batch, so a definition made in one file is
//! visible to every file processed after it in the same run. The branch
//! stack, by contrast, is per-file: every unit starts with an empty stack
//! and must close all of its blocks before end of file.

use crate::prepro::directive::{parse_conditional, ConditionalDirective};
use crate::prepro::error::{PpError, PpErrorKind};
use crate::prepro::plugins::{DirectivePlugin, RunContext};
use crate::prepro::source::{SourceLine, SourceUnit};

/// One open conditional block.
struct Frame {
    taken: bool,
    seen_else: bool,
    /// Location of the opening directive, for unterminated-block reporting.
    opened_in: String,
    opened_at: u32,
}

pub struct ConditionalPlugin;

impl DirectivePlugin for ConditionalPlugin {
    fn name(&self) -> &'static str {
        "conditional"
    }

    fn run(
        &self,
        units: Vec<SourceUnit>,
        ctx: &mut RunContext<'_, '_>,
    ) -> Result<Vec<SourceUnit>, PpError> {
        let recognize_defines = ctx.settings.allow_inline_define;
        let mut output = Vec::with_capacity(units.len());
        for unit in units {
            let mut stack: Vec<Frame> = Vec::new();
            let mut lines: Vec<SourceLine> = Vec::new();
            for line in &unit.lines {
                let Some(parsed) = parse_conditional(&line.text, recognize_defines) else {
                    if stack.iter().all(|frame| frame.taken) {
                        lines.push(line.clone());
                    }
                    continue;
                };
                let directive = parsed.map_err(|reason| {
                    PpError::new(
                        PpErrorKind::MalformedDirective,
                        reason,
                        &line.path,
                        line.number,
                    )
                })?;
                let active = stack.iter().all(|frame| frame.taken);
                match directive {
                    ConditionalDirective::If { name } | ConditionalDirective::Ifdef { name } => {
                        stack.push(Frame {
                            taken: ctx.macros.is_defined(&name),
                            seen_else: false,
                            opened_in: line.path.clone(),
                            opened_at: line.number,
                        });
                    }
                    ConditionalDirective::Ifndef { name } => {
                        stack.push(Frame {
                            taken: !ctx.macros.is_defined(&name),
                            seen_else: false,
                            opened_in: line.path.clone(),
                            opened_at: line.number,
                        });
                    }
                    ConditionalDirective::Else => {
                        let Some(frame) = stack.last_mut() else {
                            return Err(PpError::new(
                                PpErrorKind::UnmatchedEndif,
                                "#else without an open conditional",
                                &line.path,
                                line.number,
                            ));
                        };
                        if frame.seen_else {
                            return Err(PpError::new(
                                PpErrorKind::DuplicateElse,
                                "second #else in one conditional block",
                                &line.path,
                                line.number,
                            ));
                        }
                        frame.taken = !frame.taken;
                        frame.seen_else = true;
                    }
                    ConditionalDirective::Endif => {
                        if stack.pop().is_none() {
                            return Err(PpError::new(
                                PpErrorKind::UnmatchedEndif,
                                "#endif without an open conditional",
                                &line.path,
                                line.number,
                            ));
                        }
                    }
                    ConditionalDirective::Define { name, value } => {
                        if active {
                            ctx.macros.define(name, value);
                        }
                    }
                    ConditionalDirective::Undef { name } => {
                        if active {
                            ctx.macros.undefine(&name);
                        }
                    }
                }
            }
            if let Some(frame) = stack.last() {
                return Err(PpError::new(
                    PpErrorKind::UnterminatedConditional,
                    "conditional block is never closed",
                    &frame.opened_in,
                    frame.opened_at,
                ));
            }
            output.push(SourceUnit::new(unit.path, lines));
        }
        Ok(output)
    }
}
