//! End-to-end pipeline tests through the facade entry points

use prepro::prepro::api::{preprocess, preprocess_with};
use prepro::prepro::defines::{MacroTable, RunSettings};
use prepro::prepro::diagnostics::CollectingSink;
use prepro::prepro::error::PpErrorKind;
use prepro::prepro::source::MemorySource;

fn inline_define_settings() -> RunSettings {
    RunSettings {
        allow_inline_define: true,
        ..RunSettings::default()
    }
}

#[test]
fn define_then_ifdef_selects_taken_branch() {
    let mut provider = MemorySource::new();
    provider.insert("main", "#define FOO\n#ifdef FOO\nyes\n#else\nno\n#endif");
    let mut sink = CollectingSink::new();
    let out = preprocess_with(
        &provider,
        &["main"],
        None,
        &inline_define_settings(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(out, vec!["yes".to_string()]);
}

#[test]
fn undefined_conditional_block_vanishes() {
    let mut provider = MemorySource::new();
    provider.insert("main", "#ifdef MISSING\nx\n#endif");
    let out = preprocess(&provider, &["main"], None).unwrap();
    assert_eq!(out, vec!["".to_string()]);
}

#[test]
fn include_substitutes_file_content() {
    let mut provider = MemorySource::new();
    provider.insert("a", "#include \"b\"");
    provider.insert("b", "hello");
    let out = preprocess(&provider, &["a"], None).unwrap();
    assert_eq!(out, vec!["hello".to_string()]);
}

#[test]
fn mutual_includes_raise_cyclic_error() {
    let mut provider = MemorySource::new();
    provider.insert("a", "#include \"b\"");
    provider.insert("b", "#include \"a\"");
    let err = preprocess(&provider, &["a"], None).unwrap_err();
    assert_eq!(err.cause.kind, PpErrorKind::CyclicInclude);
    assert!(err.cause.message.contains("a"));
    assert_eq!(err.root, "a");
}

#[test]
fn error_directive_aborts_with_message_and_path() {
    let mut provider = MemorySource::new();
    provider.insert("main.txt", "#error \"bad config\"");
    let err = preprocess(&provider, &["main.txt"], None).unwrap_err();
    assert!(err.to_string().contains("bad config"));
    assert!(err.to_string().contains("main.txt"));
    assert_eq!(err.cause.kind, PpErrorKind::UserError);
    assert_eq!(err.cause.line, 1);
}

#[test]
fn error_anywhere_in_batch_yields_no_output_at_all() {
    let mut provider = MemorySource::new();
    provider.insert("ok", "fine");
    provider.insert("bad", "#error \"broken\"");
    // The failing file is second; the run still fails atomically.
    let err = preprocess(&provider, &["ok", "bad"], None).unwrap_err();
    assert_eq!(err.cause.kind, PpErrorKind::UserError);
    // The wrapper names the first root of the batch.
    assert_eq!(err.root, "ok");
    assert_eq!(err.cause.path, "bad");
}

#[test]
fn macro_defined_in_first_file_is_visible_in_second() {
    let mut provider = MemorySource::new();
    provider.insert("a", "#define NAME");
    provider.insert("b", "#ifdef NAME\nvisible\n#endif");
    let mut sink = CollectingSink::new();
    let out = preprocess_with(
        &provider,
        &["a", "b"],
        None,
        &inline_define_settings(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(out, vec!["".to_string(), "visible".to_string()]);
}

#[test]
fn conditionals_inside_included_files_are_evaluated() {
    let mut provider = MemorySource::new();
    provider.insert("main", "#include \"cfg\"\nbody");
    provider.insert("cfg", "#ifdef VERBOSE\nchatty\n#else\nquiet\n#endif");
    let mut defs = MacroTable::new();
    defs.define("VERBOSE", None);
    let out = preprocess(&provider, &["main"], Some(&defs)).unwrap();
    assert_eq!(out, vec!["chatty\nbody".to_string()]);
}

#[test]
fn generic_include_instantiates_template() {
    let mut provider = MemorySource::new();
    provider.insert("main", "#include \"pair\" int float");
    provider.insert("pair", "T0 first;\nT1 second;");
    let out = preprocess(&provider, &["main"], None).unwrap();
    assert_eq!(out, vec!["int first;\nfloat second;".to_string()]);
}

#[test]
fn distinct_argument_lists_instantiate_separately() {
    let mut provider = MemorySource::new();
    provider.insert(
        "main",
        "#include \"box\" int\n#include \"box\" char",
    );
    provider.insert("box", "T0 value;");
    let out = preprocess(&provider, &["main"], None).unwrap();
    assert_eq!(out, vec!["int value;\nchar value;".to_string()]);
}

#[test]
fn missing_generic_template_is_unresolved() {
    let mut provider = MemorySource::new();
    provider.insert("main", "#include \"ghost\" int");
    let err = preprocess(&provider, &["main"], None).unwrap_err();
    assert_eq!(err.cause.kind, PpErrorKind::UnresolvedInclude);
    assert!(err.cause.message.contains("ghost"));
}

#[test]
fn continuation_joins_into_one_logical_line() {
    let mut provider = MemorySource::new();
    provider.insert("main", "one \\\ntwo\nthree");
    let out = preprocess(&provider, &["main"], None).unwrap();
    assert_eq!(out, vec!["one two\nthree".to_string()]);
}

#[test]
fn error_inside_dropped_branch_is_unreachable() {
    let mut provider = MemorySource::new();
    provider.insert("main", "#ifdef MISSING\n#error \"never\"\n#endif\nok");
    let out = preprocess(&provider, &["main"], None).unwrap();
    assert_eq!(out, vec!["ok".to_string()]);
}

#[test]
fn warning_does_not_abort_and_reaches_sink() {
    let mut provider = MemorySource::new();
    provider.insert("main", "#warning \"legacy\"\nbody");
    let mut sink = CollectingSink::new();
    let out = preprocess_with(
        &provider,
        &["main"],
        None,
        &RunSettings::default(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(out, vec!["body".to_string()]);
    assert_eq!(sink.diagnostics().len(), 1);
    assert_eq!(sink.diagnostics()[0].message, "legacy");
    assert_eq!(sink.diagnostics()[0].path, "main");
    assert_eq!(sink.diagnostics()[0].line, 1);
}

#[test]
fn newline_terminated_file_round_trips_exactly() {
    let mut provider = MemorySource::new();
    provider.insert("main", "alpha\nbeta\n");
    let out = preprocess(&provider, &["main"], None).unwrap();
    assert_eq!(out, vec!["alpha\nbeta\n".to_string()]);

    provider.insert("blank", "\n");
    let out = preprocess(&provider, &["blank"], None).unwrap();
    assert_eq!(out, vec!["\n".to_string()]);
}

#[test]
fn warning_in_included_file_reports_included_path() {
    let mut provider = MemorySource::new();
    provider.insert("main", "#include \"legacy\"");
    provider.insert("legacy", "kept\n#warning \"old api\"");
    let mut sink = CollectingSink::new();
    let out = preprocess_with(
        &provider,
        &["main"],
        None,
        &RunSettings::default(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(out, vec!["kept".to_string()]);
    assert_eq!(sink.diagnostics().len(), 1);
    assert_eq!(sink.diagnostics()[0].path, "legacy");
    assert_eq!(sink.diagnostics()[0].line, 2);
}

#[test]
fn error_in_included_file_reports_included_location() {
    let mut provider = MemorySource::new();
    provider.insert("main", "top\n#include \"inner\"");
    provider.insert("inner", "\n#error \"from inner\"");
    let err = preprocess(&provider, &["main"], None).unwrap_err();
    assert_eq!(err.root, "main");
    assert_eq!(err.cause.path, "inner");
    assert_eq!(err.cause.line, 2);
}
