//! Mailbox text/row parser.
//!
//! # Responsibility
//! - Parse `number: residents` text blocks into mailbox entries.
//! - Parse two-column rows, validating numbers against existing mailboxes.
//!
//! # Invariants
//! - Errors carry the 1-based line of the offending entry.
//! - No partial output: any invalid or duplicate number fails the whole
//!   call, so bulk operations stay all-or-nothing.

use crate::model::record::Mailbox;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ParseResult<T> = Result<T, MailboxParseError>;

/// Line-numbered validation error for bulk mailbox input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailboxParseError {
    /// The number field is non-empty but not an integer.
    InvalidNumber { line: usize, value: String },
    /// The number collides with an earlier entry or an existing mailbox.
    DuplicateNumber { line: usize, number: i64 },
}

impl Display for MailboxParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { line, value } => {
                write!(f, "line {line}: mailbox number `{value}` is not a valid integer")
            }
            Self::DuplicateNumber { line, number } => {
                write!(f, "line {line}: mailbox number {number} is already used")
            }
        }
    }
}

impl Error for MailboxParseError {}

/// Parses a newline-separated block of `number: residents` lines.
///
/// Blank lines are dropped before numbering. An empty part left of the
/// first `:` marks the mailbox unnumbered; a line without `:` is treated as
/// a bare number field. Residents are comma-separated and empty pieces are
/// discarded. Output preserves input order; callers re-sort.
pub fn parse_block(text: &str) -> ParseResult<Vec<Mailbox>> {
    let lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    let mut parsed = Vec::new();
    for (index, line) in lines.enumerate() {
        let (number_text, residents_text) = match line.split_once(':') {
            Some((left, right)) => (left.trim(), right),
            None => (line, ""),
        };
        let number = parse_number(number_text, index + 1)?;
        parsed.push(Mailbox::new(number, split_residents(residents_text)));
    }

    let mut seen = BTreeSet::new();
    for (index, mailbox) in parsed.iter().enumerate() {
        if let Some(number) = mailbox.number {
            if !seen.insert(number) {
                return Err(MailboxParseError::DuplicateNumber {
                    line: index + 1,
                    number,
                });
            }
        }
    }

    Ok(parsed)
}

/// Parses two-column rows: number text and a comma-separated resident list.
///
/// Numbers are checked against `existing` mailboxes as well as earlier rows
/// in the batch, so a successful parse can be appended wholesale.
pub fn parse_rows<'a, I>(rows: I, existing: &[Mailbox]) -> ParseResult<Vec<Mailbox>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut taken: BTreeSet<i64> = existing.iter().filter_map(|m| m.number).collect();

    let mut parsed = Vec::new();
    for (index, (number_text, residents_text)) in rows.into_iter().enumerate() {
        let line = index + 1;
        let number = parse_number(number_text.trim(), line)?;
        if let Some(number) = number {
            if !taken.insert(number) {
                return Err(MailboxParseError::DuplicateNumber { line, number });
            }
        }
        parsed.push(Mailbox::new(number, split_residents(residents_text)));
    }

    Ok(parsed)
}

/// Splits a comma-separated resident list, trimming and dropping empties.
pub fn split_residents(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(text: &str, line: usize) -> ParseResult<Option<i64>> {
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i64>()
        .map(Some)
        .map_err(|_| MailboxParseError::InvalidNumber {
            line,
            value: text.to_string(),
        })
}
