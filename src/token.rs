//! Resumption-token codec.
//!
//! A resumption token is a self-contained, opaque encoding of
//! [`PaginationState`]: cursor position, the snapshotted complete list
//! size, and the original filter arguments. A continuation request carries
//! only the token and still resolves to the exact same filtered
//! enumeration as the original request.
//!
//! Wire format, version 1:
//!
//! ```text
//! v1~{cursor}~{completeListSize}~{metadataPrefix}~{from}~{until}~{set}
//! ```
//!
//! Absent filters encode as empty fields. The separator `~` is an RFC 3986
//! unreserved character, so the token travels unescaped as a single URL
//! query argument or XML attribute value.

use serde::{Deserialize, Serialize};

use crate::error::{OaiError, Result};
use crate::query::RecordFilters;

/// Version tag of the current token encoding.
const VERSION: &str = "v1";

/// Field separator; unreserved per RFC 3986.
const SEPARATOR: char = '~';

/// Number of fields in a version-1 token.
const FIELD_COUNT: usize = 7;

/// Pagination state of one list conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// Offset of the next page; always a multiple of the page size.
    pub cursor: usize,
    /// Total matches, snapshotted at the first page of the conversation.
    pub complete_list_size: usize,
    /// Filter arguments of the original request.
    pub filters: RecordFilters,
}

/// Encode pagination state into an opaque token string.
///
/// Deterministic: equal states encode to equal tokens, and
/// [`decode`] restores an equal state.
#[must_use]
pub fn encode(state: &PaginationState) -> String {
    let fields = [
        VERSION.to_string(),
        state.cursor.to_string(),
        state.complete_list_size.to_string(),
        state.filters.metadata_prefix.clone(),
        state.filters.from.clone().unwrap_or_default(),
        state.filters.until.clone().unwrap_or_default(),
        state.filters.set.clone().unwrap_or_default(),
    ];
    fields.join(&SEPARATOR.to_string())
}

/// Decode a token string back into pagination state.
///
/// # Errors
///
/// Returns [`OaiError::BadResumptionToken`] on a wrong field count, an
/// unknown version tag, or a non-numeric cursor or size.
pub fn decode(token: &str) -> Result<PaginationState> {
    let fields: Vec<&str> = token.split(SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(OaiError::BadResumptionToken(format!(
            "expected {FIELD_COUNT} fields, got {}",
            fields.len()
        )));
    }
    if fields[0] != VERSION {
        return Err(OaiError::BadResumptionToken(format!(
            "unknown token version: {}",
            fields[0]
        )));
    }
    let cursor: usize = fields[1]
        .parse()
        .map_err(|_| OaiError::BadResumptionToken(format!("invalid cursor: {}", fields[1])))?;
    let complete_list_size: usize = fields[2]
        .parse()
        .map_err(|_| OaiError::BadResumptionToken(format!("invalid size: {}", fields[2])))?;

    let optional = |field: &str| {
        if field.is_empty() {
            None
        } else {
            Some(field.to_string())
        }
    };

    Ok(PaginationState {
        cursor,
        complete_list_size,
        filters: RecordFilters {
            metadata_prefix: fields[3].to_string(),
            from: optional(fields[4]),
            until: optional(fields[5]),
            set: optional(fields[6]),
        },
    })
}
