//! Tolerant line-oriented BibTeX tokenizer
//!
//! The tokenizer makes a single forward pass over the input, one line at a
//! time:
//! - blank lines and `%` comments are skipped
//! - a line starting with `@` opens an entry (`@type{key,`)
//! - a line containing `=` inside an entry is a field assignment
//! - a line that is exactly `}` closes the current entry
//!
//! Broken input never aborts the pass. Problems are recorded as
//! [`SyntaxError`]s and scanning continues with the next line. An entry that
//! is never closed is still emitted, flagged once as unterminated.

use nom::{
    bytes::complete::take_until,
    character::complete::char,
    sequence::{preceded, terminated},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::entry::BibEntry;

/// `@` directives that are not bibliographic records
const DIRECTIVES: &[&str] = &["comment", "preamble", "string"];

/// Category of a syntax-level problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxErrorKind {
    /// `@` line without a `{`
    MissingOpeningBrace,
    /// `@{key,` with nothing before the brace
    MissingEntryType,
    /// `@type{` with nothing after the brace
    MissingCitationKey,
    /// `= value` with nothing before the `=`
    EmptyFieldName,
    /// `name =` with nothing left after stripping
    EmptyFieldValue,
    /// Entry never received its closing `}`
    Unterminated,
}

/// A syntax problem tied to a source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: u32,
    pub citation_key: Option<String>,
    pub message: String,
}

impl SyntaxError {
    fn missing_opening_brace(line: u32) -> Self {
        Self {
            kind: SyntaxErrorKind::MissingOpeningBrace,
            line,
            citation_key: None,
            message: format!("Syntax error (line {line}): entry header has no opening brace"),
        }
    }

    fn missing_entry_type(line: u32) -> Self {
        Self {
            kind: SyntaxErrorKind::MissingEntryType,
            line,
            citation_key: None,
            message: format!("Syntax error (line {line}): entry header has no entry type"),
        }
    }

    fn missing_citation_key(line: u32) -> Self {
        Self {
            kind: SyntaxErrorKind::MissingCitationKey,
            line,
            citation_key: None,
            message: format!("Syntax error (line {line}): entry header has no citation key"),
        }
    }

    fn empty_field_name(line: u32, entry: &BibEntry) -> Self {
        Self {
            kind: SyntaxErrorKind::EmptyFieldName,
            line,
            citation_key: Some(entry.citation_key.clone()),
            message: format!(
                "Syntax error (line {line}): field without a name in entry '{}'",
                entry.citation_key
            ),
        }
    }

    fn empty_field_value(line: u32, entry: &BibEntry, field: &str) -> Self {
        Self {
            kind: SyntaxErrorKind::EmptyFieldValue,
            line,
            citation_key: Some(entry.citation_key.clone()),
            message: format!(
                "Syntax error (line {line}): field '{field}' has an empty value in entry '{}'",
                entry.citation_key
            ),
        }
    }

    fn unterminated(entry: &BibEntry) -> Self {
        Self {
            kind: SyntaxErrorKind::Unterminated,
            line: entry.source_line,
            citation_key: Some(entry.citation_key.clone()),
            message: format!(
                "Syntax error (line {}): entry '{}' is not terminated by a closing brace",
                entry.source_line, entry.citation_key
            ),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of tokenizing a bibliography
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutput {
    pub entries: Vec<BibEntry>,
    pub errors: Vec<SyntaxError>,
}

/// Tokenize raw bibliography text.
///
/// Never fails: malformed input shows up in [`ParseOutput::errors`].
pub fn parse(input: &str) -> ParseOutput {
    Tokenizer::default().run(input)
}

#[derive(Default)]
struct Tokenizer {
    output: ParseOutput,
    open: Option<BibEntry>,
}

impl Tokenizer {
    fn run(mut self, input: &str) -> ParseOutput {
        for (index, raw) in input.lines().enumerate() {
            let line_no = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let line = raw.trim();

            if line.is_empty() || line.starts_with('%') {
                continue;
            }

            if line.starts_with('@') {
                self.start_entry(line, line_no);
            } else if line == "}" {
                self.close_entry(line_no);
            } else if line.contains('=') {
                self.field_line(line, line_no);
            }
        }

        if let Some(entry) = self.open.take() {
            self.emit_unterminated(entry);
        }

        self.output
    }

    fn start_entry(&mut self, line: &str, line_no: u32) {
        if let Some(previous) = self.open.take() {
            self.emit_unterminated(previous);
        }

        let Ok((rest, raw_type)) = entry_header(line) else {
            self.output
                .errors
                .push(SyntaxError::missing_opening_brace(line_no));
            return;
        };

        let entry_type = raw_type.trim().to_lowercase();
        if entry_type.is_empty() {
            self.output
                .errors
                .push(SyntaxError::missing_entry_type(line_no));
            return;
        }
        if DIRECTIVES.contains(&entry_type.as_str()) {
            debug!(line = line_no, directive = %entry_type, "skipping directive");
            return;
        }

        let rest = rest.trim();
        let key = rest.strip_suffix(',').unwrap_or(rest).trim();
        if key.is_empty() {
            self.output
                .errors
                .push(SyntaxError::missing_citation_key(line_no));
            return;
        }

        self.open = Some(BibEntry::new(entry_type, key, line_no));
    }

    fn close_entry(&mut self, line_no: u32) {
        match self.open.take() {
            Some(entry) => {
                debug!(key = %entry.citation_key, fields = entry.fields.len(), "closed entry");
                self.output.entries.push(entry);
            }
            None => debug!(line = line_no, "closing brace outside of an entry"),
        }
    }

    fn field_line(&mut self, line: &str, line_no: u32) {
        let Some(entry) = self.open.as_mut() else {
            debug!(line = line_no, "field assignment outside of an entry");
            return;
        };
        let Ok((raw_value, raw_name)) = field_assignment(line) else {
            return;
        };

        let name = raw_name.trim().to_lowercase();
        let (value, closes_entry) = clean_value(raw_value);

        if name.is_empty() {
            self.output
                .errors
                .push(SyntaxError::empty_field_name(line_no, entry));
        } else {
            if value.is_empty() {
                self.output
                    .errors
                    .push(SyntaxError::empty_field_value(line_no, entry, &name));
            }
            entry.set_field(name, value);
        }

        if closes_entry {
            self.close_entry(line_no);
        }
    }

    fn emit_unterminated(&mut self, entry: BibEntry) {
        debug!(key = %entry.citation_key, line = entry.source_line, "entry not terminated");
        self.output.errors.push(SyntaxError::unterminated(&entry));
        self.output.entries.push(entry);
    }
}

/// `@type{rest` -> (`rest`, `type`)
fn entry_header(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), terminated(take_until("{"), char('{')))(input)
}

/// `name = value` -> (` value`, `name `)
fn field_assignment(input: &str) -> IResult<&str, &str> {
    terminated(take_until("="), char('='))(input)
}

/// Strip a trailing comma and one layer of enclosing braces or quotes.
///
/// A value with an unbalanced trailing `}` (`year = {2020}}`) also closes
/// the entry; the second element of the result reports that.
fn clean_value(raw: &str) -> (String, bool) {
    let mut value = strip_trailing_comma(raw.trim());
    let mut closes_entry = false;

    if brace_balance(value) < 0 {
        if let Some(stripped) = value.strip_suffix('}') {
            value = strip_trailing_comma(stripped.trim_end());
            closes_entry = true;
        }
    }

    (unwrap_delimited(value).trim().to_string(), closes_entry)
}

fn strip_trailing_comma(value: &str) -> &str {
    value.strip_suffix(',').unwrap_or(value).trim_end()
}

/// Braces that are not LaTeX-escaped (`\{`, `\}`), with their byte offsets
fn structural_braces(value: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut escaped = false;
    value.char_indices().filter(move |&(_, c)| {
        let structural = !escaped && (c == '{' || c == '}');
        escaped = !escaped && c == '\\';
        structural
    })
}

fn brace_balance(value: &str) -> i32 {
    structural_braces(value).fold(0, |depth, (_, c)| match c {
        '{' => depth + 1,
        _ => depth - 1,
    })
}

fn unwrap_delimited(value: &str) -> &str {
    if value.len() < 2 {
        return value;
    }
    let quoted = value.starts_with('"') && value.ends_with('"');
    if quoted || outer_braces_match(value) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// True when the value opens with `{` and that brace closes at the very end
fn outer_braces_match(value: &str) -> bool {
    if !value.starts_with('{') {
        return false;
    }
    let mut depth = 0;
    for (pos, c) in structural_braces(value) {
        if c == '{' {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return pos == value.len() - 1;
            }
        }
    }
    false
}
