#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # OAI Provider
//!
//! A library implementing the data-provider core of the OAI-PMH protocol
//! for a catalog of bibliographic records: deterministic, resumable
//! pagination over filtered record enumerations, and a rule-governed
//! crosswalk from internal bibliographic records to MODS 3.7 (with a
//! legacy Dublin Core mapping as a second metadata prefix).
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::collections::HashMap;
//! use oai_provider::{pagination, ProviderConfig};
//!
//! # fn main() -> oai_provider::Result<()> {
//! let config = ProviderConfig::from_env()?;
//! let store = connect_to_store()?; // anything implementing RecordStore
//!
//! let mut args = HashMap::new();
//! args.insert("metadataPrefix".to_string(), "mods".to_string());
//! args.insert("from".to_string(), "2020-01-01".to_string());
//!
//! let page = pagination::list_records(&store, &config, &args)?;
//! for record in &page.items {
//!     println!("{} {}", record.header.identifier, record.header.datestamp);
//! }
//! if let Some(token) = page.resumption_token {
//!     println!("continue with resumptionToken={token}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`record`] — bibliographic record input model and harvested-record output model
//! - [`config`] — environment context and identifier conversion
//! - [`vocabulary`] — static controlled-vocabulary lookup tables
//! - [`formats`] — disseminable metadata formats (`mods`, `oai_dc`)
//! - [`crosswalk`] — MODS 3.7 crosswalk engine
//! - [`dublin_core`] — legacy Dublin Core mapping
//! - [`token`] — resumption-token codec
//! - [`query`] — filter compilation and the backing-store boundary
//! - [`verbs`] — protocol verbs and the generic argument validator
//! - [`pagination`] — the list-conversation state machine and `GetRecord`
//! - [`error`] — error taxonomy and result type
//!
//! ## Statelessness
//!
//! Every request is handled independently: all state needed to resume an
//! enumeration travels inside the resumption token, so the library holds
//! no per-harvester session. The only shared data are the read-only
//! vocabulary tables and the caller's store handle.

pub mod config;
pub mod crosswalk;
pub mod dublin_core;
pub mod error;
pub mod formats;
pub mod pagination;
pub mod query;
pub mod record;
pub mod token;
pub mod verbs;
pub mod vocabulary;

pub use config::ProviderConfig;
pub use error::{OaiError, Result};
pub use pagination::{get_record, list_identifiers, list_records, ListPage};
pub use query::{RecordFilters, RecordPage, RecordQuery, RecordStore};
pub use record::{BibliographicRecord, MetadataRecord, RecordHeader};
pub use token::PaginationState;
pub use verbs::{validate_arguments, Verb};
