//! BibTeX tokenizing for bibgrade
//!
//! This crate turns the raw text of a bibliography file into structured
//! entries plus a list of syntax problems. It is deliberately forgiving:
//! student-submitted files are often malformed, and the engine still has to
//! read whatever it can.
//!
//! Features:
//! - Line-oriented single pass, no backtracking
//! - Recovery from unterminated entries and broken headers
//! - Brace and quote stripping on field values
//! - `@comment`, `@preamble` and `@string` directives are skipped

mod entry;
pub mod parser;

pub use entry::{BibEntry, BibField};
pub use parser::{parse, ParseOutput, SyntaxError, SyntaxErrorKind};
