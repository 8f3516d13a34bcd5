//! List pagination protocol and record retrieval.
//!
//! One logical "list verb" conversation is a chain of requests sharing a
//! resumption-token lineage. The first request resolves its filters from
//! bare arguments at cursor 0; every continuation resolves both filters
//! and cursor from the decoded token. The complete list size is
//! snapshotted at the first page and carried inside the token so the
//! enumeration stays stable even if the store changes mid-walk.
//!
//! A token is minted iff `cursor + page_len < complete_list_size`; the
//! terminal page carries no token. Per-record crosswalk failures are
//! data-integrity faults: they are logged and skipped, never aborting the
//! page.

use std::collections::HashMap;

use crate::config::ProviderConfig;
use crate::crosswalk;
use crate::error::{OaiError, Result};
use crate::formats;
use crate::query::{RecordFilters, RecordQuery, RecordStore};
use crate::record::{BibliographicRecord, MetadataRecord, RecordHeader};
use crate::token::{self, PaginationState};
use crate::verbs::{validate_arguments, Verb};
use crate::vocabulary;

/// One page of a list conversation.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    /// Converted records of this page, in store order.
    pub items: Vec<T>,
    /// Token for the next page; `None` on the terminal page.
    pub resumption_token: Option<String>,
    /// Cursor this page was served at.
    pub cursor: usize,
    /// Complete list size, snapshotted at the first page.
    pub complete_list_size: usize,
}

/// Resolved parameters of one list request: filters, cursor, and the
/// size snapshot when continuing an existing conversation.
#[derive(Debug, Clone)]
struct ListRequest {
    filters: RecordFilters,
    cursor: usize,
    snapshot: Option<usize>,
}

impl ListRequest {
    /// Resolve a request either from bare arguments (initial) or from a
    /// decoded resumption token (continuation). Validation has already
    /// rejected requests carrying both, so token fields are authoritative
    /// whenever a token is present.
    fn resolve(args: &HashMap<String, String>, page_size: usize) -> Result<Self> {
        if let Some(raw) = args.get("resumptionToken") {
            let state: PaginationState = token::decode(raw)?;
            if state.filters.metadata_prefix.is_empty() {
                return Err(OaiError::BadResumptionToken(
                    "token carries no metadataPrefix".to_string(),
                ));
            }
            if state.cursor % page_size != 0 {
                return Err(OaiError::BadResumptionToken(format!(
                    "cursor {} is not aligned to page size {page_size}",
                    state.cursor
                )));
            }
            return Ok(ListRequest {
                filters: state.filters,
                cursor: state.cursor,
                snapshot: Some(state.complete_list_size),
            });
        }

        let filters = RecordFilters {
            metadata_prefix: args.get("metadataPrefix").cloned().unwrap_or_default(),
            from: args.get("from").cloned(),
            until: args.get("until").cloned(),
            set: args.get("set").cloned(),
        };
        Ok(ListRequest {
            filters,
            cursor: 0,
            snapshot: None,
        })
    }
}

/// Serve one `ListRecords` page: full records (header + metadata body).
///
/// # Errors
///
/// The full protocol taxonomy: `BadArgument`, `BadResumptionToken`,
/// `CannotDisseminateFormat`, `NoSetHierarchy`, `NoRecordsMatch`, plus
/// `StoreUnavailable` passed through from the store.
pub fn list_records(
    store: &dyn RecordStore,
    config: &ProviderConfig,
    args: &HashMap<String, String>,
) -> Result<ListPage<MetadataRecord>> {
    run_list(store, config, Verb::ListRecords, args, |record, prefix| {
        crosswalk::crosswalk_record(record, config, prefix)
    })
}

/// Serve one `ListIdentifiers` page: record headers only. Shares the
/// token chain and filter semantics with [`list_records`].
///
/// # Errors
///
/// Same taxonomy as [`list_records`].
pub fn list_identifiers(
    store: &dyn RecordStore,
    config: &ProviderConfig,
    args: &HashMap<String, String>,
) -> Result<ListPage<RecordHeader>> {
    run_list(store, config, Verb::ListIdentifiers, args, |record, _| {
        crosswalk::build_header(record, config)
    })
}

fn run_list<T>(
    store: &dyn RecordStore,
    config: &ProviderConfig,
    verb: Verb,
    args: &HashMap<String, String>,
    convert: impl Fn(&BibliographicRecord, &str) -> Result<T>,
) -> Result<ListPage<T>> {
    validate_arguments(verb, args)?;
    let request = ListRequest::resolve(args, config.page_size)?;
    formats::lookup(&request.filters.metadata_prefix)?;
    check_set(request.filters.set.as_deref())?;

    let query = RecordQuery::compile(&request.filters, request.cursor, config.page_size)?;
    let page = store.list(&query)?;

    if page.records.is_empty() {
        // An empty continuation page means the token points past the end
        // of its conversation: a client protocol error, not a server fault.
        return Err(if request.cursor == 0 {
            OaiError::NoRecordsMatch
        } else {
            OaiError::BadResumptionToken(format!(
                "cursor {} points past the end of the list",
                request.cursor
            ))
        });
    }

    let complete_list_size = request.snapshot.unwrap_or(page.total_matches);
    let page_len = page.records.len();

    let mut items = Vec::with_capacity(page_len);
    for record in &page.records {
        match convert(record, &request.filters.metadata_prefix) {
            Ok(item) => items.push(item),
            Err(OaiError::InvalidRecord { id, reason }) => {
                log::warn!("skipping malformed record {id}: {reason}");
            }
            Err(other) => return Err(other),
        }
    }

    let resumption_token = if request.cursor + page_len < complete_list_size {
        Some(token::encode(&PaginationState {
            cursor: request.cursor + config.page_size,
            complete_list_size,
            filters: request.filters.clone(),
        }))
    } else {
        None
    };

    Ok(ListPage {
        items,
        resumption_token,
        cursor: request.cursor,
        complete_list_size,
    })
}

/// The set hierarchy is flat: the single institutional set. Any other set
/// spec is unknown.
fn check_set(set: Option<&str>) -> Result<()> {
    match set {
        None => Ok(()),
        Some(set) if set == vocabulary::INSTITUTION_CODE => Ok(()),
        Some(other) => Err(OaiError::NoSetHierarchy(other.to_string())),
    }
}

/// Serve one `GetRecord` request.
///
/// # Errors
///
/// `BadArgument` for an illegal argument set, `CannotDisseminateFormat`
/// for an unknown prefix, `IdDoesNotExist` when the identifier is not of
/// this repository or absent from the store, and `InvalidRecord` when the
/// stored record fails the crosswalk's required-field checks.
pub fn get_record(
    store: &dyn RecordStore,
    config: &ProviderConfig,
    args: &HashMap<String, String>,
) -> Result<MetadataRecord> {
    validate_arguments(Verb::GetRecord, args)?;
    let identifier = args
        .get("identifier")
        .ok_or_else(|| OaiError::BadArgument("missing identifier".to_string()))?;
    let metadata_prefix = args
        .get("metadataPrefix")
        .ok_or_else(|| OaiError::BadArgument("missing metadataPrefix".to_string()))?;
    formats::lookup(metadata_prefix)?;

    let id = config
        .parse_external_identifier(identifier)
        .ok_or_else(|| OaiError::IdDoesNotExist(identifier.clone()))?;
    let record = store
        .get(id)?
        .ok_or_else(|| OaiError::IdDoesNotExist(identifier.clone()))?;
    crosswalk::crosswalk_record(&record, config, metadata_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RecordPage;

    struct MemoryStore {
        records: Vec<BibliographicRecord>,
    }

    impl RecordStore for MemoryStore {
        fn list(&self, query: &RecordQuery) -> Result<RecordPage> {
            let mut matching: Vec<&BibliographicRecord> = self
                .records
                .iter()
                .filter(|record| query.matches(record))
                .collect();
            matching.sort_by_key(|record| record.id);
            let total_matches = matching.len();
            let records = matching
                .into_iter()
                .skip(query.cursor)
                .take(query.page_size)
                .cloned()
                .collect();
            Ok(RecordPage {
                records,
                total_matches,
            })
        }

        fn get(&self, id: u64) -> Result<Option<BibliographicRecord>> {
            Ok(self.records.iter().find(|record| record.id == id).cloned())
        }
    }

    fn record(id: u64, updated_at: &str) -> BibliographicRecord {
        serde_json::from_str(&format!(
            r#"{{
                "publication_id": {id},
                "title": "Record {id}",
                "publication_type_code": "publication_journal-article",
                "affiliated": true,
                "updated_at": "{updated_at}"
            }}"#
        ))
        .unwrap()
    }

    fn store_of(count: u64) -> MemoryStore {
        MemoryStore {
            records: (1..=count)
                .map(|id| record(id, "2020-06-01T12:00:00"))
                .collect(),
        }
    }

    fn config(page_size: usize) -> ProviderConfig {
        ProviderConfig {
            uri_prefix: "https://gup.ub.gu.se/publication".to_string(),
            identifier_prefix: "oai:gup.ub.gu.se".to_string(),
            record_id_prefix: "publication".to_string(),
            page_size,
        }
    }

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_first_page_and_token() {
        let store = store_of(5);
        let config = config(2);
        let page = list_records(
            &store,
            &config,
            &args(&[
                ("metadataPrefix", "mods"),
                ("from", "2020-01-01"),
                ("until", "2020-12-31"),
                ("set", "gu"),
            ]),
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.cursor, 0);
        assert_eq!(page.complete_list_size, 5);
        let token = page.resumption_token.unwrap();
        assert_eq!(token, "v1~2~5~mods~2020-01-01~2020-12-31~gu");
    }

    #[test]
    fn test_full_conversation_visits_each_record_once() {
        let store = store_of(5);
        let config = config(2);
        let mut request = args(&[("metadataPrefix", "mods")]);
        let mut seen = Vec::new();
        loop {
            let page = list_records(&store, &config, &request).unwrap();
            for item in &page.items {
                seen.push(item.header.identifier.clone());
            }
            match page.resumption_token {
                Some(token) => request = args(&[("resumptionToken", &token)]),
                None => break,
            }
        }
        assert_eq!(seen.len(), 5);
        let unique: std::collections::HashSet<_> = seen.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_terminal_page_has_no_token() {
        let store = store_of(4);
        let config = config(2);
        let first = list_records(&store, &config, &args(&[("metadataPrefix", "mods")])).unwrap();
        let token = first.resumption_token.unwrap();
        let second =
            list_records(&store, &config, &args(&[("resumptionToken", &token)])).unwrap();
        assert_eq!(second.cursor, 2);
        assert_eq!(second.items.len(), 2);
        assert!(second.resumption_token.is_none());
    }

    #[test]
    fn test_no_records_match() {
        let store = store_of(3);
        let config = config(2);
        let result = list_records(
            &store,
            &config,
            &args(&[("metadataPrefix", "mods"), ("from", "2021-01-01")]),
        );
        assert!(matches!(result, Err(OaiError::NoRecordsMatch)));
    }

    #[test]
    fn test_token_past_end_is_protocol_error() {
        let store = store_of(3);
        let config = config(2);
        let past_end = token::encode(&PaginationState {
            cursor: 8,
            complete_list_size: 3,
            filters: RecordFilters {
                metadata_prefix: "mods".to_string(),
                ..RecordFilters::default()
            },
        });
        let result = list_records(&store, &config, &args(&[("resumptionToken", &past_end)]));
        assert!(matches!(result, Err(OaiError::BadResumptionToken(_))));
    }

    #[test]
    fn test_misaligned_cursor_rejected() {
        let store = store_of(5);
        let config = config(2);
        let misaligned = token::encode(&PaginationState {
            cursor: 3,
            complete_list_size: 5,
            filters: RecordFilters {
                metadata_prefix: "mods".to_string(),
                ..RecordFilters::default()
            },
        });
        let result = list_records(&store, &config, &args(&[("resumptionToken", &misaligned)]));
        assert!(matches!(result, Err(OaiError::BadResumptionToken(_))));
    }

    #[test]
    fn test_token_without_prefix_rejected() {
        let store = store_of(5);
        let config = config(2);
        let result = list_records(
            &store,
            &config,
            &args(&[("resumptionToken", "v1~2~5~~~~")]),
        );
        assert!(matches!(result, Err(OaiError::BadResumptionToken(_))));
    }

    #[test]
    fn test_unsupported_prefix_rejected_before_store_access() {
        let store = store_of(5);
        let config = config(2);
        let result = list_records(&store, &config, &args(&[("metadataPrefix", "marcxml")]));
        assert!(matches!(result, Err(OaiError::CannotDisseminateFormat(_))));
    }

    #[test]
    fn test_unknown_set_rejected() {
        let store = store_of(5);
        let config = config(2);
        let result = list_records(
            &store,
            &config,
            &args(&[("metadataPrefix", "mods"), ("set", "chalmers")]),
        );
        assert!(matches!(result, Err(OaiError::NoSetHierarchy(_))));
    }

    #[test]
    fn test_malformed_record_is_skipped_not_fatal() {
        let mut store = store_of(3);
        store.records[1].title = String::new();
        let config = config(10);
        let page = list_records(&store, &config, &args(&[("metadataPrefix", "mods")])).unwrap();
        // Three matches, one skipped; the page is served, not aborted.
        assert_eq!(page.complete_list_size, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.resumption_token.is_none());
    }

    #[test]
    fn test_list_identifiers_shares_protocol() {
        let store = store_of(3);
        let config = config(2);
        let page =
            list_identifiers(&store, &config, &args(&[("metadataPrefix", "oai_dc")])).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].identifier, "oai:gup.ub.gu.se/1");
        assert!(page.resumption_token.is_some());
    }

    #[test]
    fn test_get_record() {
        let store = store_of(3);
        let config = config(2);
        let record = get_record(
            &store,
            &config,
            &args(&[
                ("identifier", "oai:gup.ub.gu.se/2"),
                ("metadataPrefix", "mods"),
            ]),
        )
        .unwrap();
        assert_eq!(record.header.identifier, "oai:gup.ub.gu.se/2");
        assert!(record.body.contains("<title>Record 2</title>"));
    }

    #[test]
    fn test_get_record_unknown_id() {
        let store = store_of(3);
        let config = config(2);
        let result = get_record(
            &store,
            &config,
            &args(&[
                ("identifier", "oai:gup.ub.gu.se/99"),
                ("metadataPrefix", "mods"),
            ]),
        );
        assert!(matches!(result, Err(OaiError::IdDoesNotExist(_))));

        let result = get_record(
            &store,
            &config,
            &args(&[
                ("identifier", "oai:elsewhere/1"),
                ("metadataPrefix", "mods"),
            ]),
        );
        assert!(matches!(result, Err(OaiError::IdDoesNotExist(_))));
    }
}
