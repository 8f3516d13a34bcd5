//! End-to-end pagination conversations against an in-memory store.

mod common;

use std::collections::{HashMap, HashSet};

use common::{article, test_config, MemoryStore};
use oai_provider::{pagination, OaiError};

fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn store_of_five() -> MemoryStore {
    MemoryStore {
        records: (1..=5)
            .map(|id| article(id, "2020-06-01T12:00:00"))
            .collect(),
    }
}

/// Filters `{from, until, set}` with page size 2 over 5 matching records:
/// the conversation takes exactly three requests, tokens encoding cursors
/// 2 and 4, the terminal page carrying none.
#[test]
fn test_three_page_conversation() {
    let store = store_of_five();
    let config = test_config(2);

    let first = pagination::list_records(
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
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.complete_list_size, 5);
    let token = first.resumption_token.clone().unwrap();
    assert_eq!(token, "v1~2~5~mods~2020-01-01~2020-12-31~gu");

    let second =
        pagination::list_records(&store, &config, &args(&[("resumptionToken", &token)])).unwrap();
    assert_eq!(second.cursor, 2);
    assert_eq!(second.items.len(), 2);
    assert_eq!(
        second.items[0].header.identifier,
        "oai:gup.ub.gu.se/3"
    );
    let token = second.resumption_token.clone().unwrap();
    assert_eq!(token, "v1~4~5~mods~2020-01-01~2020-12-31~gu");

    let third =
        pagination::list_records(&store, &config, &args(&[("resumptionToken", &token)])).unwrap();
    assert_eq!(third.cursor, 4);
    assert_eq!(third.items.len(), 1);
    assert!(third.resumption_token.is_none());
}

/// Walking all tokens from cursor 0 to terminal visits each matching
/// record exactly once, and the union of all pages equals a one-shot
/// fetch of the same total.
#[test]
fn test_enumeration_is_idempotent_and_complete() {
    let store = MemoryStore {
        records: (1..=13)
            .map(|id| article(id, "2021-02-03T04:05:06"))
            .collect(),
    };
    let config = test_config(4);

    let mut request = args(&[("metadataPrefix", "mods")]);
    let mut visited = Vec::new();
    loop {
        let page = pagination::list_records(&store, &config, &request).unwrap();
        assert!(page.items.len() <= config.page_size);
        for item in &page.items {
            visited.push(item.header.identifier.clone());
        }
        match page.resumption_token {
            Some(token) => request = args(&[("resumptionToken", &token)]),
            None => break,
        }
    }

    assert_eq!(visited.len(), 13);
    let unique: HashSet<_> = visited.iter().cloned().collect();
    assert_eq!(unique.len(), 13);

    let one_shot = pagination::list_records(
        &store,
        &test_config(20),
        &args(&[("metadataPrefix", "mods")]),
    )
    .unwrap();
    let one_shot_ids: HashSet<_> = one_shot
        .items
        .iter()
        .map(|item| item.header.identifier.clone())
        .collect();
    assert_eq!(unique, one_shot_ids);
}

/// Two identical calls return identical orderings.
#[test]
fn test_enumeration_is_deterministic() {
    let store = store_of_five();
    let config = test_config(3);
    let request = args(&[("metadataPrefix", "mods")]);
    let first = pagination::list_records(&store, &config, &request).unwrap();
    let second = pagination::list_records(&store, &config, &request).unwrap();
    let ids = |page: &pagination::ListPage<oai_provider::MetadataRecord>| {
        page.items
            .iter()
            .map(|item| item.header.identifier.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.resumption_token, second.resumption_token);
}

/// Date bounds are inclusive on both ends.
#[test]
fn test_inclusive_date_bounds() {
    let store = MemoryStore {
        records: vec![
            article(1, "2020-01-01T00:00:00"),
            article(2, "2020-06-15T12:00:00"),
            article(3, "2020-12-31T23:59:59"),
            article(4, "2021-01-01T00:00:00"),
        ],
    };
    let config = test_config(10);
    let page = pagination::list_records(
        &store,
        &config,
        &args(&[
            ("metadataPrefix", "mods"),
            ("from", "2020-01-01"),
            ("until", "2020-12-31"),
        ]),
    )
    .unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.complete_list_size, 3);
}

/// Both a token and bare arguments present is a validation failure before
/// any token decoding happens; a token whose decode lacks a metadata
/// prefix fails as a bad token.
#[test]
fn test_argument_validator_scenarios() {
    let store = store_of_five();
    let config = test_config(2);

    let conflicting = pagination::list_records(
        &store,
        &config,
        &args(&[
            ("resumptionToken", "v1~2~5~mods~~~"),
            ("metadataPrefix", "mods"),
        ]),
    );
    assert!(matches!(conflicting, Err(OaiError::BadArgument(_))));

    let missing_prefix = pagination::list_records(
        &store,
        &config,
        &args(&[("resumptionToken", "v1~2~5~~~~")]),
    );
    assert!(matches!(
        missing_prefix,
        Err(OaiError::BadResumptionToken(_))
    ));
}

/// The size snapshot in the token wins over a changed store count, so a
/// conversation terminates where its first page said it would.
#[test]
fn test_complete_list_size_is_snapshotted() {
    let mut store = store_of_five();
    let config = test_config(2);
    let first =
        pagination::list_records(&store, &config, &args(&[("metadataPrefix", "mods")])).unwrap();
    let token = first.resumption_token.unwrap();

    // Records appended after the first page do not grow the conversation.
    store.records.push(article(6, "2020-06-01T12:00:00"));
    store.records.push(article(7, "2020-06-01T12:00:00"));

    let second =
        pagination::list_records(&store, &config, &args(&[("resumptionToken", &token)])).unwrap();
    assert_eq!(second.complete_list_size, 5);
    let token = second.resumption_token.unwrap();

    let third =
        pagination::list_records(&store, &config, &args(&[("resumptionToken", &token)])).unwrap();
    assert_eq!(third.cursor, 4);
    assert!(third.resumption_token.is_none());
}

/// `ListIdentifiers` runs the same conversation over headers only.
#[test]
fn test_list_identifiers_conversation() {
    let store = store_of_five();
    let config = test_config(2);
    let mut request = args(&[("metadataPrefix", "oai_dc"), ("set", "gu")]);
    let mut count = 0;
    loop {
        let page = pagination::list_identifiers(&store, &config, &request).unwrap();
        for header in &page.items {
            assert!(header.identifier.starts_with("oai:gup.ub.gu.se/"));
            assert_eq!(header.datestamp, "2020-06-01T12:00:00Z");
            assert_eq!(header.set_specs, vec!["gu".to_string()]);
            count += 1;
        }
        match page.resumption_token {
            Some(token) => request = args(&[("resumptionToken", &token)]),
            None => break,
        }
    }
    assert_eq!(count, 5);
}

/// Unaffiliated records fall outside the institutional set but are part
/// of the unfiltered enumeration.
#[test]
fn test_set_filtering() {
    let mut records: Vec<_> = (1..=4)
        .map(|id| article(id, "2020-06-01T12:00:00"))
        .collect();
    records[2].affiliated = false;
    let store = MemoryStore { records };
    let config = test_config(10);

    let in_set = pagination::list_records(
        &store,
        &config,
        &args(&[("metadataPrefix", "mods"), ("set", "gu")]),
    )
    .unwrap();
    assert_eq!(in_set.complete_list_size, 3);

    let all = pagination::list_records(&store, &config, &args(&[("metadataPrefix", "mods")]))
        .unwrap();
    assert_eq!(all.complete_list_size, 4);
}

/// A deleted record is enumerated with a header-only entry.
#[test]
fn test_deleted_record_in_listing() {
    let mut records = vec![article(1, "2020-06-01T12:00:00")];
    records[0].deleted = true;
    let store = MemoryStore { records };
    let config = test_config(10);
    let page =
        pagination::list_records(&store, &config, &args(&[("metadataPrefix", "mods")])).unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(page.items[0].header.deleted);
    assert!(page.items[0].body.is_empty());
}
