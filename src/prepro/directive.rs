//! Directive line recognition
//!
//! One directive per physical line, leading whitespace ignored. Recognition
//! is split per stage family: each stage asks only about the keywords it
//! owns, so a line that is a later stage's directive passes through earlier
//! stages untouched, and a `#something` line no stage owns is ordinary text.
//!
//! Each `parse_*` function returns:
//! - `None`                 — not a directive of this family,
//! - `Some(Ok(directive))`  — recognized and well-formed,
//! - `Some(Err(reason))`    — recognized keyword with unparseable syntax;
//!                            the stage reports it as a malformed-directive
//!                            error at the line's location.

use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#([A-Za-z]+)\b(.*)$").expect("directive head regex"));

static MACRO_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*$").expect("macro name regex"));

static QUOTED_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"([^"]+)"\s*(.*)$"#).expect("quoted target regex"));

static QUOTED_MESSAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"([^"]*)"\s*$"#).expect("quoted message regex"));

/// Split a line into its directive keyword and the remainder, if it starts
/// with `#keyword`.
pub fn split_directive(text: &str) -> Option<(&str, &str)> {
    DIRECTIVE_HEAD.captures(text).map(|caps| {
        (
            caps.get(1).expect("keyword group").as_str(),
            caps.get(2).expect("rest group").as_str(),
        )
    })
}

/// An `#include` directive, concrete or pseudo-generic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeDirective {
    Plain { target: String },
    Generic { target: String, args: Vec<String> },
}

pub fn parse_include(text: &str) -> Option<Result<IncludeDirective, String>> {
    let (keyword, rest) = split_directive(text)?;
    if keyword != "include" {
        return None;
    }
    let Some(caps) = QUOTED_TARGET.captures(rest) else {
        return Some(Err("expected a quoted include path".to_string()));
    };
    let target = caps.get(1).expect("target group").as_str().to_string();
    let args: Vec<String> = caps
        .get(2)
        .expect("args group")
        .as_str()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if args.is_empty() {
        Some(Ok(IncludeDirective::Plain { target }))
    } else {
        Some(Ok(IncludeDirective::Generic { target, args }))
    }
}

/// A directive owned by the conditional stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalDirective {
    If { name: String },
    Ifdef { name: String },
    Ifndef { name: String },
    Else,
    Endif,
    Define { name: String, value: Option<String> },
    Undef { name: String },
}

/// Recognize a conditional-stage directive. `#define`/`#undef` are only
/// recognized when `recognize_defines` is set; otherwise those lines are
/// not this stage's business and pass through as text.
pub fn parse_conditional(
    text: &str,
    recognize_defines: bool,
) -> Option<Result<ConditionalDirective, String>> {
    let (keyword, rest) = split_directive(text)?;
    match keyword {
        "if" | "ifdef" | "ifndef" => {
            let Some(name) = macro_name(rest) else {
                return Some(Err(format!("#{} expects a single macro name", keyword)));
            };
            Some(Ok(match keyword {
                "if" => ConditionalDirective::If { name },
                "ifdef" => ConditionalDirective::Ifdef { name },
                _ => ConditionalDirective::Ifndef { name },
            }))
        }
        "else" => Some(bare(rest, ConditionalDirective::Else, "#else")),
        "endif" => Some(bare(rest, ConditionalDirective::Endif, "#endif")),
        "define" if recognize_defines => {
            let rest = rest.trim();
            let mut parts = rest.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or("");
            if macro_name(name).is_none() {
                return Some(Err("#define expects a macro name".to_string()));
            }
            let value = parts.next().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
            Some(Ok(ConditionalDirective::Define {
                name: name.to_string(),
                value,
            }))
        }
        "undef" if recognize_defines => {
            let Some(name) = macro_name(rest) else {
                return Some(Err("#undef expects a single macro name".to_string()));
            };
            Some(Ok(ConditionalDirective::Undef { name }))
        }
        _ => None,
    }
}

/// An abort/warn directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExceptionDirective {
    Error { message: String },
    Warning { message: String },
}

pub fn parse_exception(text: &str) -> Option<Result<ExceptionDirective, String>> {
    let (keyword, rest) = split_directive(text)?;
    let wrap: fn(String) -> ExceptionDirective = match keyword {
        "error" => |message| ExceptionDirective::Error { message },
        "warning" => |message| ExceptionDirective::Warning { message },
        _ => return None,
    };
    match QUOTED_MESSAGE.captures(rest) {
        Some(caps) => Some(Ok(wrap(caps.get(1).expect("message group").as_str().to_string()))),
        None => Some(Err(format!("#{} expects a quoted message", keyword))),
    }
}

fn macro_name(rest: &str) -> Option<String> {
    MACRO_NAME
        .captures(rest)
        .map(|caps| caps.get(1).expect("name group").as_str().to_string())
}

fn bare(
    rest: &str,
    directive: ConditionalDirective,
    label: &str,
) -> Result<ConditionalDirective, String> {
    if rest.trim().is_empty() {
        Ok(directive)
    } else {
        Err(format!("{} takes no operands", label))
    }
}
