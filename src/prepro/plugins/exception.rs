//! Abort and warn directives
//!
//! `#error "message"` aborts the run with the directive's literal text and
//! original location. `#warning "message"` reports to the run's diagnostic
//! sink and is stripped; it is the only directive that does not abort.
//!
//! This stage runs after conditionals, so an `#error` inside a dropped
//! branch is never reached.

use crate::prepro::diagnostics::Diagnostic;
use crate::prepro::directive::{parse_exception, ExceptionDirective};
use crate::prepro::error::{PpError, PpErrorKind};
use crate::prepro::plugins::{DirectivePlugin, RunContext};
use crate::prepro::source::SourceUnit;

pub struct ExceptionPlugin;

impl DirectivePlugin for ExceptionPlugin {
    fn name(&self) -> &'static str {
        "exception"
    }

    fn run(
        &self,
        units: Vec<SourceUnit>,
        ctx: &mut RunContext<'_, '_>,
    ) -> Result<Vec<SourceUnit>, PpError> {
        let mut output = Vec::with_capacity(units.len());
        for unit in units {
            let mut lines = Vec::with_capacity(unit.lines.len());
            for line in unit.lines {
                match parse_exception(&line.text) {
                    Some(Ok(ExceptionDirective::Error { message })) => {
                        return Err(PpError::new(
                            PpErrorKind::UserError,
                            format!("#error \"{}\"", message),
                            &line.path,
                            line.number,
                        ));
                    }
                    Some(Ok(ExceptionDirective::Warning { message })) => {
                        ctx.sink.report(Diagnostic {
                            message,
                            path: line.path.clone(),
                            line: line.number,
                        });
                    }
                    Some(Err(reason)) => {
                        return Err(PpError::new(
                            PpErrorKind::MalformedDirective,
                            reason,
                            &line.path,
                            line.number,
                        ));
                    }
                    None => lines.push(line),
                }
            }
            output.push(SourceUnit::new(unit.path, lines));
        }
        Ok(output)
    }
}
