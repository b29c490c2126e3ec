//! Recursive include inlining
//!
//! Replaces each `#include "path"` line with the fully-expanded content of
//! the target, resolved through the run's content provider (generated
//! generic instantiations first, then the caller's provider). Included
//! lines keep their own (path, line) tags so later errors point at the file
//! they really come from.
//!
//! A trailing newline on an included file is its terminator, not content:
//! the final empty segment is dropped before inlining, so including a
//! newline-terminated file does not inject a blank line. Root units are
//! untouched by this rule.
//!
//! Cycle detection is an explicit open-set check performed *before*
//! recursing, which bounds recursion depth at the depth of the include
//! tree and makes the failure deterministic rather than a stack overflow.

use crate::prepro::directive::{parse_include, IncludeDirective};
use crate::prepro::error::{PpError, PpErrorKind};
use crate::prepro::plugins::{DirectivePlugin, RunContext};
use crate::prepro::source::{ContentProvider, SourceLine, SourceUnit};

pub struct IncludePlugin;

impl DirectivePlugin for IncludePlugin {
    fn name(&self) -> &'static str {
        "include"
    }

    fn run(
        &self,
        units: Vec<SourceUnit>,
        ctx: &mut RunContext<'_, '_>,
    ) -> Result<Vec<SourceUnit>, PpError> {
        let mut output = Vec::with_capacity(units.len());
        for unit in units {
            // The open-set is scoped to one root file's expansion.
            let mut open = vec![unit.path.clone()];
            let lines = expand(&unit, &*ctx.includes, &mut open)?;
            output.push(SourceUnit::new(unit.path, lines));
        }
        Ok(output)
    }
}

fn expand(
    unit: &SourceUnit,
    provider: &dyn ContentProvider,
    open: &mut Vec<String>,
) -> Result<Vec<SourceLine>, PpError> {
    let mut expanded = Vec::with_capacity(unit.lines.len());
    for line in &unit.lines {
        match parse_include(&line.text) {
            Some(Ok(IncludeDirective::Plain { target })) => {
                // Checked before recursing.
                if open.iter().any(|p| p == &target) {
                    let mut chain = open.clone();
                    chain.push(target);
                    return Err(PpError::new(
                        PpErrorKind::CyclicInclude,
                        format!("include cycle: {}", chain.join(" -> ")),
                        &line.path,
                        line.number,
                    ));
                }
                let Some(mut content) = provider.lines(&target) else {
                    return Err(PpError::new(
                        PpErrorKind::UnresolvedInclude,
                        format!("cannot resolve include '{}'", target),
                        &line.path,
                        line.number,
                    ));
                };
                // Trailing newline is the file's terminator, not a line.
                if content.last().map_or(false, |l| l.is_empty()) {
                    content.pop();
                }
                let included_lines = content
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| SourceLine::new(target.as_str(), i as u32 + 1, text))
                    .collect();
                let included = SourceUnit::new(target.as_str(), included_lines);
                open.push(target);
                let mut inner = expand(&included, provider, open)?;
                open.pop();
                expanded.append(&mut inner);
            }
            Some(Err(reason)) => {
                return Err(PpError::new(
                    PpErrorKind::MalformedDirective,
                    reason,
                    &line.path,
                    line.number,
                ));
            }
            // Generic includes were rewritten by the fake-generics stage;
            // one surviving here is left for the output as-is.
            _ => expanded.push(line.clone()),
        }
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_root(
        unit: &SourceUnit,
        provider: &dyn ContentProvider,
    ) -> Result<Vec<SourceLine>, PpError> {
        let mut open = vec![unit.path.clone()];
        expand(unit, provider, &mut open)
    }

    #[test]
    fn inlines_included_lines_with_their_own_tags() {
        let mut provider = crate::prepro::source::MemorySource::new();
        provider.insert("b", "hello\nworld");
        let unit = SourceUnit::from_text("a", "before\n#include \"b\"\nafter");

        let lines = expand_root(&unit, &provider).unwrap();
        let rendered: Vec<(&str, &str, u32)> = lines
            .iter()
            .map(|l| (l.path.as_str(), l.text.as_str(), l.number))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("a", "before", 1),
                ("b", "hello", 1),
                ("b", "world", 2),
                ("a", "after", 3)
            ]
        );
    }

    #[test]
    fn newline_terminated_include_adds_no_blank_line() {
        let mut provider = crate::prepro::source::MemorySource::new();
        provider.insert("b", "hello\n");
        let unit = SourceUnit::from_text("a", "#include \"b\"\nafter");

        let lines = expand_root(&unit, &provider).unwrap();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "after"]);
    }

    #[test]
    fn nested_includes_expand_recursively() {
        let mut provider = crate::prepro::source::MemorySource::new();
        provider.insert("b", "#include \"c\"");
        provider.insert("c", "deep");
        let unit = SourceUnit::from_text("a", "#include \"b\"");

        let lines = expand_root(&unit, &provider).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "deep");
        assert_eq!(lines[0].path, "c");
    }

    #[test]
    fn direct_cycle_is_detected() {
        let mut provider = crate::prepro::source::MemorySource::new();
        provider.insert("a", "#include \"b\"");
        provider.insert("b", "#include \"a\"");
        let unit = SourceUnit::from_text("a", "#include \"b\"");

        let err = expand_root(&unit, &provider).unwrap_err();
        assert_eq!(err.kind, PpErrorKind::CyclicInclude);
        assert!(err.message.contains("a -> b -> a"));
        assert_eq!(err.path, "b");
    }

    #[test]
    fn self_include_is_a_cycle() {
        let mut provider = crate::prepro::source::MemorySource::new();
        provider.insert("a", "#include \"a\"");
        let unit = SourceUnit::from_text("a", "#include \"a\"");

        let err = expand_root(&unit, &provider).unwrap_err();
        assert_eq!(err.kind, PpErrorKind::CyclicInclude);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn missing_target_is_unresolved() {
        let provider = crate::prepro::source::MemorySource::new();
        let unit = SourceUnit::from_text("a", "#include \"ghost\"");

        let err = expand_root(&unit, &provider).unwrap_err();
        assert_eq!(err.kind, PpErrorKind::UnresolvedInclude);
        assert!(err.message.contains("ghost"));
    }

    #[test]
    fn diamond_includes_are_not_cycles() {
        // a includes b and c; both include d. d is expanded twice, no error.
        let mut provider = crate::prepro::source::MemorySource::new();
        provider.insert("b", "#include \"d\"");
        provider.insert("c", "#include \"d\"");
        provider.insert("d", "shared");
        let unit = SourceUnit::from_text("a", "#include \"b\"\n#include \"c\"");

        let lines = expand_root(&unit, &provider).unwrap();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["shared", "shared"]);
    }
}
