//! Filter model and backing-store boundary.
//!
//! A list request is compiled into a [`RecordQuery`]: one of four date
//! regimes (no bounds, lower only, upper only, both) conjoined with an
//! optional set-membership predicate, plus a cursor and page size. The
//! [`RecordStore`] trait is the external collaborator boundary; the store
//! must honor inclusive date bounds and order results by internal numeric
//! id ascending so that pagination is deterministic across calls.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{OaiError, Result};
use crate::record::BibliographicRecord;

/// Filter arguments of one list conversation. Carried in full inside every
/// resumption token so a continuation request resolves to the exact same
/// enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilters {
    /// Requested metadata prefix.
    pub metadata_prefix: String,
    /// Inclusive lower datestamp bound (`YYYY-MM-DD` or full timestamp).
    pub from: Option<String>,
    /// Inclusive upper datestamp bound (`YYYY-MM-DD` or full timestamp).
    pub until: Option<String>,
    /// Set-membership filter.
    pub set: Option<String>,
}

/// The four date regimes a list request can compile into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateWindow {
    /// No date bounds.
    Unbounded,
    /// Lower bound only, inclusive.
    From(NaiveDateTime),
    /// Upper bound only, inclusive.
    Until(NaiveDateTime),
    /// Both bounds, inclusive.
    Between(NaiveDateTime, NaiveDateTime),
}

impl DateWindow {
    /// Whether `instant` falls inside this window.
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        match self {
            DateWindow::Unbounded => true,
            DateWindow::From(from) => instant >= *from,
            DateWindow::Until(until) => instant <= *until,
            DateWindow::Between(from, until) => instant >= *from && instant <= *until,
        }
    }
}

/// One compiled backing-store query: date window, optional set predicate,
/// cursor offset, and page size.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    /// Date window over the record update timestamp.
    pub window: DateWindow,
    /// Set the records must belong to, if any.
    pub set: Option<String>,
    /// Offset into the ordered match list.
    pub cursor: usize,
    /// Maximum number of records to return.
    pub page_size: usize,
}

impl RecordQuery {
    /// Compile filter arguments into a query.
    ///
    /// # Errors
    ///
    /// Returns [`OaiError::BadArgument`] when a date bound is not a
    /// `YYYY-MM-DD` date or `YYYY-MM-DDThh:mm:ss[Z]` timestamp.
    pub fn compile(filters: &RecordFilters, cursor: usize, page_size: usize) -> Result<Self> {
        let from = filters
            .from
            .as_deref()
            .map(|raw| parse_bound(raw, BoundKind::Lower))
            .transpose()?;
        let until = filters
            .until
            .as_deref()
            .map(|raw| parse_bound(raw, BoundKind::Upper))
            .transpose()?;
        let window = match (from, until) {
            (None, None) => DateWindow::Unbounded,
            (Some(from), None) => DateWindow::From(from),
            (None, Some(until)) => DateWindow::Until(until),
            (Some(from), Some(until)) => DateWindow::Between(from, until),
        };
        Ok(RecordQuery {
            window,
            set: filters.set.clone(),
            cursor,
            page_size,
        })
    }

    /// Whether a record matches the date window and set predicate.
    /// The reference predicate for store implementations; in-process
    /// stores can use it directly.
    #[must_use]
    pub fn matches(&self, record: &BibliographicRecord) -> bool {
        let Some(updated_at) = parse_timestamp(&record.updated_at) else {
            return false;
        };
        if !self.window.contains(updated_at) {
            return false;
        }
        match self.set.as_deref() {
            None => true,
            Some(set) => set == crate::vocabulary::INSTITUTION_CODE && record.affiliated,
        }
    }
}

#[derive(Clone, Copy)]
enum BoundKind {
    Lower,
    Upper,
}

/// Parse a date bound. A bare date expands to the first instant of the day
/// for lower bounds and the last instant for upper bounds, keeping both
/// bounds inclusive.
fn parse_bound(raw: &str, kind: BoundKind) -> Result<NaiveDateTime> {
    let raw = raw.trim_end_matches('Z');
    if let Ok(instant) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(instant);
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let instant = match kind {
            BoundKind::Lower => date.and_hms_opt(0, 0, 0),
            BoundKind::Upper => date.and_hms_opt(23, 59, 59),
        };
        if let Some(instant) = instant {
            return Ok(instant);
        }
    }
    Err(OaiError::BadArgument(format!("invalid date: {raw}")))
}

/// Parse a record update timestamp, with or without fractional seconds.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// One page of matching records together with the total match count.
#[derive(Debug, Clone)]
pub struct RecordPage {
    /// Records of this page, ordered by internal numeric id ascending.
    pub records: Vec<BibliographicRecord>,
    /// Total number of records matching the query, across all pages.
    pub total_matches: usize,
}

/// Backing-store boundary.
///
/// Implementations must return records in a stable order (internal numeric
/// id ascending) and honor inclusive date bounds; both are required for the
/// pagination protocol to enumerate each matching record exactly once.
/// Transient failures surface as
/// [`OaiError::StoreUnavailable`](crate::error::OaiError::StoreUnavailable).
pub trait RecordStore {
    /// Execute a compiled query, returning one page plus the total count.
    fn list(&self, query: &RecordQuery) -> Result<RecordPage>;

    /// Fetch one record by internal numeric id.
    fn get(&self, id: u64) -> Result<Option<BibliographicRecord>>;
}
