//! Publication identifiers and parsed records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of digits in a publication identifier token.
pub const ID_WIDTH: usize = 9;

/// Number of digits in a publication year.
const YEAR_WIDTH: usize = 4;

/// Fixed-width 9-digit publication identifier.
///
/// Displays zero-padded, so `PublicationId(42)` prints as `000000042`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicationId(pub u32);

impl PublicationId {
    /// Parse exactly nine ASCII digits.
    pub fn from_digits(text: &str) -> Option<Self> {
        parse_fixed_digits(text, ID_WIDTH).map(|v| PublicationId(v as u32))
    }

    /// Index into dense id-addressed storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = ID_WIDTH)
    }
}

/// Four-digit publication year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Year(pub u16);

impl Year {
    /// Parse exactly four ASCII digits.
    pub fn from_digits(text: &str) -> Option<Self> {
        parse_fixed_digits(text, YEAR_WIDTH).map(|v| Year(v as u16))
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = YEAR_WIDTH)
    }
}

fn parse_fixed_digits(text: &str, width: usize) -> Option<u64> {
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits_value(text.as_bytes()))
}

fn digits_value(digits: &[u8]) -> u64 {
    digits.iter().fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'))
}

/// True if `text` is a concatenation of zero or more 9-digit tokens.
pub(crate) fn is_token_run(text: &str) -> bool {
    text.len() % ID_WIDTH == 0 && text.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// ReferenceIds
// ============================================================================

/// Iterator over a validated run of fixed-width id tokens.
///
/// The run carries no separators: `"000000001000000002"` yields ids 1 and 2.
#[derive(Debug, Clone)]
pub struct ReferenceIds<'a> {
    rest: &'a [u8],
}

impl<'a> ReferenceIds<'a> {
    /// Wrap a token run. Callers must have checked it with the record grammar;
    /// a trailing partial token is ignored.
    pub(crate) fn new(run: &'a str) -> Self {
        Self { rest: run.as_bytes() }
    }
}

impl Iterator for ReferenceIds<'_> {
    type Item = PublicationId;

    fn next(&mut self) -> Option<PublicationId> {
        if self.rest.len() < ID_WIDTH {
            return None;
        }
        let (token, rest) = self.rest.split_at(ID_WIDTH);
        self.rest = rest;
        Some(PublicationId(digits_value(token) as u32))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rest.len() / ID_WIDTH;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ReferenceIds<'_> {}

// ============================================================================
// PublicationRecord
// ============================================================================

/// One accepted bibliographic entry, borrowing from its source line.
///
/// Only produced by [`crate::wos::parse_record`], so every field has passed
/// format validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationRecord<'a> {
    pub id: PublicationId,
    pub year: Year,
    /// Raw, un-normalized title text.
    pub title: &'a str,
    pub(crate) references: &'a str,
    pub(crate) citations: &'a str,
}

impl<'a> PublicationRecord<'a> {
    /// Referenced ids in their original order.
    pub fn references(&self) -> ReferenceIds<'a> {
        ReferenceIds::new(self.references)
    }

    /// The raw reference token run.
    pub fn reference_tokens(&self) -> &'a str {
        self.references
    }

    pub fn reference_count(&self) -> usize {
        self.references.len() / ID_WIDTH
    }

    /// Citing ids in their original order.
    pub fn citations(&self) -> ReferenceIds<'a> {
        ReferenceIds::new(self.citations)
    }

    pub fn citation_count(&self) -> usize {
        self.citations.len() / ID_WIDTH
    }
}
