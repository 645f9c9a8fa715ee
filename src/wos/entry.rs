//! Record line decoder.

use crate::model::record::is_token_run;
use crate::model::{PublicationId, PublicationRecord, Year};
use super::Rejection;

/// Lines with fewer columns are rejected outright.
pub const MIN_FIELDS: usize = 15;

/// Column holding the raw title.
pub const TITLE_FIELD: usize = 9;

/// Decode one record line.
///
/// Acceptance is all-or-nothing: checks run in column order (field count,
/// id, year, title, references, citations) and the first failure is
/// reported.
pub fn parse_record(line: &str) -> Result<PublicationRecord<'_>, Rejection> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < MIN_FIELDS {
        return Err(Rejection::TooFewFields { found: fields.len() });
    }

    let id = PublicationId::from_digits(fields[0])
        .ok_or_else(|| Rejection::InvalidId(fields[0].to_string()))?;

    let year = Year::from_digits(fields[1])
        .ok_or_else(|| Rejection::InvalidYear(fields[1].to_string()))?;

    // A title must survive normalization as at least one word.
    let title = fields[TITLE_FIELD];
    if !title.chars().any(char::is_alphanumeric) {
        return Err(Rejection::EmptyTitle(fields[0].to_string()));
    }

    let references = fields[fields.len() - 2];
    if !is_token_run(references) {
        return Err(Rejection::InvalidReferences(references.to_string()));
    }

    let citations = fields[fields.len() - 1];
    if !is_token_run(citations) {
        return Err(Rejection::InvalidCitations(citations.to_string()));
    }

    Ok(PublicationRecord { id, year, title, references, citations })
}
