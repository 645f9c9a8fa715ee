//! # Web-of-Science Record Format
//!
//! One record per line, `;`-delimited, empty fields preserved:
//!
//! | Column | Content |
//! |--------|---------|
//! | 0 | id: last nine digits of the accession number |
//! | 1 | year, four digits |
//! | 2 | document type (one letter) |
//! | 3 | DOI (optional) |
//! | 4 | subject (two letters, optional) |
//! | 5 | ISO journal (optional) |
//! | 6..=8 | volume, issue, pages |
//! | 9 | title |
//! | 10 | number of authors *n*, followed by *n* author columns |
//! | .. | number of journals *m*, followed by *m* journal labels |
//! | .. | summary (optional) |
//! | second to last | references: concatenated 9-digit ids |
//! | last | citations: concatenated 9-digit ids |
//!
//! Only the fixed leading columns and the two trailing id runs are read.
//! Pure functions, no I/O.

pub mod entry;

pub use entry::{parse_record, MIN_FIELDS, TITLE_FIELD};

use crate::model::PublicationRecord;
use crate::Result;

/// Decode one line, surfacing a rejection as [`crate::Error::RecordRejected`].
pub fn parse(line: &str) -> Result<PublicationRecord<'_>> {
    Ok(parse_record(line)?)
}

/// Why a line was not accepted as a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("expected at least {min} fields, found {found}", min = MIN_FIELDS)]
    TooFewFields { found: usize },

    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("invalid year: {0:?}")]
    InvalidYear(String),

    #[error("empty title for publication {0}")]
    EmptyTitle(String),

    #[error("invalid references: {0:?}")]
    InvalidReferences(String),

    #[error("invalid citations: {0:?}")]
    InvalidCitations(String),
}
