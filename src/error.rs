//! Error types for OAI-PMH provider operations.
//!
//! This module provides the [`OaiError`] type for all provider operations
//! and the [`Result`] convenience type. The first seven variants form the
//! protocol-level taxonomy surfaced to harvesters verbatim; the remaining
//! variants are server-side conditions that never reach the wire as-is.

use thiserror::Error;

/// Error type for all OAI-PMH provider operations.
///
/// Protocol errors are deterministic functions of the request and must not
/// be retried by callers; [`OaiError::StoreUnavailable`] is the one
/// transient condition for which retrying the identical request is safe.
#[derive(Error, Debug)]
pub enum OaiError {
    /// The request named a verb this repository does not implement.
    #[error("Bad verb: {0}")]
    BadVerb(String),

    /// Illegal argument combination for the requested verb.
    #[error("Bad argument: {0}")]
    BadArgument(String),

    /// Resumption token malformed, undecodable, or pointing past the end
    /// of its conversation.
    #[error("Bad resumption token: {0}")]
    BadResumptionToken(String),

    /// The requested metadata prefix is not supported by this repository.
    #[error("Cannot disseminate format: {0}")]
    CannotDisseminateFormat(String),

    /// The filter combination matched zero records on the first page of a
    /// conversation.
    #[error("No records match the given criteria")]
    NoRecordsMatch,

    /// The identifier given to `GetRecord` is absent from the backing store.
    #[error("Identifier does not exist: {0}")]
    IdDoesNotExist(String),

    /// A set was requested that is not part of the repository's hierarchy.
    #[error("No set hierarchy: {0}")]
    NoSetHierarchy(String),

    /// Data-integrity fault: a record from the store is missing a required
    /// field. Fatal for that one record only; pagination logs and skips it.
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord {
        /// Internal numeric identifier of the offending record.
        id: u64,
        /// What was missing or malformed.
        reason: String,
    },

    /// Transient backing-store failure (timeout, connection loss).
    /// Safe for the caller to retry with the identical request.
    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),

    /// A required environment variable is missing or unparsable.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl OaiError {
    /// OAI-PMH error code for protocol-level variants, `None` for
    /// server-side conditions that are surfaced as a server fault instead.
    #[must_use]
    pub fn protocol_code(&self) -> Option<&'static str> {
        match self {
            OaiError::BadVerb(_) => Some("badVerb"),
            OaiError::BadArgument(_) => Some("badArgument"),
            OaiError::BadResumptionToken(_) => Some("badResumptionToken"),
            OaiError::CannotDisseminateFormat(_) => Some("cannotDisseminateFormat"),
            OaiError::NoRecordsMatch => Some("noRecordsMatch"),
            OaiError::IdDoesNotExist(_) => Some("idDoesNotExist"),
            OaiError::NoSetHierarchy(_) => Some("noSetHierarchy"),
            _ => None,
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`OaiError`].
pub type Result<T> = std::result::Result<T, OaiError>;
