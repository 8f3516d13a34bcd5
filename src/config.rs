//! Provider configuration and identifier conversion.
//!
//! The crosswalk and pagination logic are pure functions of one record plus
//! a small amount of environment context: the URI prefix used for full-text
//! links, the identifier prefix harvesters see, the internal record-id
//! prefix used by the backing store, and the page size of list responses.
//!
//! The two identifier forms are losslessly convertible in both directions:
//! `{identifier_prefix}/{id}` on the wire, `{record_id_prefix}_{id}`
//! internally.

use serde::{Deserialize, Serialize};

use crate::error::{OaiError, Result};

/// Environment context for one provider instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Prefix for constructed URIs (landing pages, full-text links),
    /// e.g. `https://gup.ub.gu.se/publication`.
    pub uri_prefix: String,
    /// Prefix of externally visible OAI identifiers,
    /// e.g. `oai:gup.ub.gu.se`.
    pub identifier_prefix: String,
    /// Prefix of internal record identifiers in the backing store,
    /// e.g. `publication`.
    pub record_id_prefix: String,
    /// Number of records per list page.
    pub page_size: usize,
}

impl ProviderConfig {
    /// Load the configuration from environment variables `URI_PREFIX`,
    /// `IDENTIFIER_PREFIX`, `RECORD_ID_PREFIX`, and `COUNT`.
    ///
    /// # Errors
    ///
    /// Returns [`OaiError::Configuration`] if a variable is missing, empty,
    /// or (for `COUNT`) not a positive integer.
    pub fn from_env() -> Result<Self> {
        let uri_prefix = required_env("URI_PREFIX")?;
        let identifier_prefix = required_env("IDENTIFIER_PREFIX")?;
        let record_id_prefix = required_env("RECORD_ID_PREFIX")?;
        let count = required_env("COUNT")?;
        let page_size: usize = count
            .parse()
            .map_err(|_| OaiError::Configuration(format!("COUNT is not an integer: {count}")))?;
        if page_size == 0 {
            return Err(OaiError::Configuration("COUNT must be positive".to_string()));
        }
        Ok(ProviderConfig {
            uri_prefix,
            identifier_prefix,
            record_id_prefix,
            page_size,
        })
    }

    /// Externally visible OAI identifier for an internal numeric id.
    #[must_use]
    pub fn external_identifier(&self, id: u64) -> String {
        format!("{}/{id}", self.identifier_prefix)
    }

    /// Parse an externally visible identifier back to the internal numeric
    /// id. Returns `None` if the prefix does not match or the trailing
    /// segment is not a number.
    #[must_use]
    pub fn parse_external_identifier(&self, identifier: &str) -> Option<u64> {
        let rest = identifier.strip_prefix(&self.identifier_prefix)?;
        let rest = rest.strip_prefix('/')?;
        rest.parse().ok()
    }

    /// Internal store identifier for a numeric id.
    #[must_use]
    pub fn internal_identifier(&self, id: u64) -> String {
        format!("{}_{id}", self.record_id_prefix)
    }

    /// Parse an internal store identifier back to the numeric id.
    #[must_use]
    pub fn parse_internal_identifier(&self, identifier: &str) -> Option<u64> {
        let rest = identifier.strip_prefix(&self.record_id_prefix)?;
        let rest = rest.strip_prefix('_')?;
        rest.parse().ok()
    }

    /// Constructed URI for a record (landing page / full-text location).
    #[must_use]
    pub fn record_uri(&self, id: u64) -> String {
        format!("{}/{id}", self.uri_prefix)
    }
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(OaiError::Configuration(format!(
            "missing environment variable {name}"
        ))),
    }
}
