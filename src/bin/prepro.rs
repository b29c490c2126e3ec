//! Command-line interface for prepro
//!
//! Expands directive-bearing text files into fully-resolved output.
//!
//! Usage:
//!   prepro `<files>`... [-D NAME[=VALUE]]... [--defs `<json>`]
//!          [--root `<dir>`] [--allow-define] [--output `<file>`]
//!
//! Each root file is preprocessed against a disk-backed provider rooted at
//! `--root`; expanded outputs are printed in input order (or written to
//! `--output`). `#warning` diagnostics go to stderr; the first error aborts
//! with a non-zero exit code.

use clap::{Arg, ArgAction, Command};
use prepro::prepro::api::preprocess_with;
use prepro::prepro::defines::{MacroTable, RunSettings};
use prepro::prepro::diagnostics::StderrSink;
use prepro::prepro::source::DiskSource;
use std::fs;
use std::process;

fn main() {
    let matches = Command::new("prepro")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A directive-driven preprocessor for line-oriented text")
        .arg_required_else_help(true)
        .arg(
            Arg::new("files")
                .help("Root files to preprocess, relative to --root")
                .required(true)
                .num_args(1..),
        )
        .arg(
            Arg::new("define")
                .long("define")
                .short('D')
                .help("Initial macro definition, NAME or NAME=VALUE")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("defs")
                .long("defs")
                .help("JSON file with initial definitions ({\"NAME\": null | \"value\"})"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .help("Directory include paths are resolved against")
                .default_value("."),
        )
        .arg(
            Arg::new("allow-define")
                .long("allow-define")
                .help("Recognize in-stream #define/#undef directives")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write concatenated output here instead of stdout"),
        )
        .get_matches();

    let files: Vec<&str> = matches
        .get_many::<String>("files")
        .expect("files are required")
        .map(String::as_str)
        .collect();
    let root = matches.get_one::<String>("root").expect("root has a default");

    let mut defs = match matches.get_one::<String>("defs") {
        Some(path) => load_defs_file(path),
        None => MacroTable::new(),
    };
    if let Some(specs) = matches.get_many::<String>("define") {
        for spec in specs {
            let (name, value) = parse_define_spec(spec);
            defs.define(name, value);
        }
    }

    let settings = RunSettings {
        allow_inline_define: matches.get_flag("allow-define"),
        ..RunSettings::default()
    };

    handle_preprocess(
        root,
        &files,
        &defs,
        &settings,
        matches.get_one::<String>("output").map(String::as_str),
    );
}

/// Split `NAME=VALUE` (or bare `NAME`) into a definitions entry.
fn parse_define_spec(spec: &str) -> (String, Option<String>) {
    match spec.split_once('=') {
        Some((name, value)) => (name.to_string(), Some(value.to_string())),
        None => (spec.to_string(), None),
    }
}

/// Load a JSON definitions file ({"NAME": null | "value"}) as a macro table.
fn load_defs_file(path: &str) -> MacroTable {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read defs file '{}': {}", path, err);
            process::exit(2);
        }
    };
    match serde_json::from_str(&text) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: invalid defs file '{}': {}", path, err);
            process::exit(2);
        }
    }
}

/// Run the pipeline and emit the expanded outputs.
fn handle_preprocess(
    root: &str,
    files: &[&str],
    defs: &MacroTable,
    settings: &RunSettings,
    output: Option<&str>,
) {
    let provider = DiskSource::new(root);
    let mut sink = StderrSink;
    match preprocess_with(&provider, files, Some(defs), settings, &mut sink) {
        Ok(outputs) => {
            let combined = outputs.join("\n");
            match output {
                Some(path) => {
                    if let Err(err) = fs::write(path, combined + "\n") {
                        eprintln!("error: cannot write '{}': {}", path, err);
                        process::exit(2);
                    }
                }
                None => println!("{}", combined),
            }
        }
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}
