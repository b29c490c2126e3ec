//! Pseudo-generic include expansion
//!
//! `#include "pair" K V` instantiates the template file `pair` once for the
//! argument list `K V` under the mangled name `pair_K_V`, then rewrites the
//! directive to a concrete `#include "pair_K_V"`. Content generation is
//! delegated to a [`GenericInclude`] provider; the generated unit is
//! registered in the run's include overlay so the include stage finds it
//! like any other file.
//!
//! This stage runs first: after it, the batch contains only concrete
//! include directives.

use crate::prepro::directive::{parse_include, IncludeDirective};
use crate::prepro::error::{PpError, PpErrorKind};
use crate::prepro::plugins::{DirectivePlugin, RunContext};
use crate::prepro::source::{ContentProvider, SourceLine, SourceUnit};
use once_cell::sync::Lazy;
use regex::Regex;

/// Produces the content of one generic instantiation, given the template
/// path and the directive's argument list. `None` means the template could
/// not be resolved.
pub trait GenericInclude {
    fn instantiate(
        &self,
        base: &str,
        args: &[String],
        provider: &dyn ContentProvider,
    ) -> Option<Vec<String>>;
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bT(\d+)\b").expect("placeholder regex"));

/// Default instantiation strategy: load the template through the content
/// provider and substitute the positional placeholders `T0`, `T1`, … with
/// the directive's arguments. Placeholders with no matching argument are
/// left untouched.
#[derive(Debug, Default)]
pub struct TemplateExpander;

impl GenericInclude for TemplateExpander {
    fn instantiate(
        &self,
        base: &str,
        args: &[String],
        provider: &dyn ContentProvider,
    ) -> Option<Vec<String>> {
        let template = provider.lines(base)?;
        let substituted = template
            .iter()
            .map(|line| {
                PLACEHOLDER
                    .replace_all(line, |caps: &regex::Captures<'_>| {
                        let index: usize = caps[1].parse().unwrap_or(usize::MAX);
                        match args.get(index) {
                            Some(arg) => arg.clone(),
                            None => caps[0].to_string(),
                        }
                    })
                    .into_owned()
            })
            .collect();
        Some(substituted)
    }
}

/// Mangle a template path and argument list into the concrete include
/// target: the stem is joined with the arguments by `_`, the extension (if
/// any) is preserved. `list.h` + `T U` → `list_T_U.h`.
pub fn mangle(target: &str, args: &[String]) -> String {
    let suffix = args.join("_");
    match target.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", target, suffix),
    }
}

pub struct FakeGenericsPlugin;

impl DirectivePlugin for FakeGenericsPlugin {
    fn name(&self) -> &'static str {
        "fake-generics"
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
                match parse_include(&line.text) {
                    Some(Ok(IncludeDirective::Generic { target, args })) => {
                        let mangled = mangle(&target, &args);
                        // One instantiation per distinct mangled name per run.
                        if !ctx.includes.contains_generated(&mangled) {
                            let Some(generated) =
                                ctx.generics.instantiate(&target, &args, &*ctx.includes)
                            else {
                                return Err(PpError::new(
                                    PpErrorKind::UnresolvedInclude,
                                    format!("cannot resolve generic template '{}'", target),
                                    &line.path,
                                    line.number,
                                ));
                            };
                            ctx.includes.register(mangled.clone(), generated);
                        }
                        lines.push(SourceLine::new(
                            line.path,
                            line.number,
                            format!("#include \"{}\"", mangled),
                        ));
                    }
                    // Concrete includes, malformed includes, and everything
                    // else belong to later stages.
                    _ => lines.push(line),
                }
            }
            output.push(SourceUnit::new(unit.path, lines));
        }
        Ok(output)
    }
}
