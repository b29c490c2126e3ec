//! # prepro
//!
//! A directive-driven preprocessor for line-oriented text.
//!
//! The crate expands a batch of source files through a fixed sequence of
//! directive stages (pseudo-generic includes, include inlining, conditional
//! compilation, abort/warn directives, line continuation) driven by a shared
//! macro-definition table. See the [pipeline module](prepro::pipeline) for the
//! stage ordering contract and the [api module](prepro::api) for the
//! high-level entry points.

pub mod prepro;
