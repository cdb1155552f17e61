//! Domain files, fixtures, REPL, and CLI for TextGlass.
//!
//! This crate provides:
//! - [`DomainFiles`] - Locating and reading a domain directory
//! - [`run_fixture`] - Checking an engine against a test fixture
//! - [`Repl`] - Interactive classification
//! - [`logging`] - Subscriber setup for the `textglass` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod editor;
pub mod fixture;
pub mod load;
pub mod logging;
pub mod repl;

pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use fixture::{AttributeMismatch, CaseFailure, FailureReason, FixtureReport, run_fixture};
pub use load::{DomainDocuments, DomainFiles, load_engine, parse_document, read_document};
pub use logging::Verbosity;
pub use repl::{Outcome, Repl};
