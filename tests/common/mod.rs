//! Shared test fixtures: an in-memory record store and record builders.
#![allow(dead_code)]

use oai_provider::query::{RecordPage, RecordQuery, RecordStore};
use oai_provider::record::BibliographicRecord;
use oai_provider::{ProviderConfig, Result};

/// In-memory store with the ordering and counting contract of the real
/// backing index: matches are sorted by id ascending and the total is
/// computed over the full match set, not the page.
pub struct MemoryStore {
    pub records: Vec<BibliographicRecord>,
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

/// Provider configuration used across the integration suites.
pub fn test_config(page_size: usize) -> ProviderConfig {
    ProviderConfig {
        uri_prefix: "https://gup.ub.gu.se/publication".to_string(),
        identifier_prefix: "oai:gup.ub.gu.se".to_string(),
        record_id_prefix: "publication".to_string(),
        page_size,
    }
}

/// A plain affiliated journal article updated at the given instant.
pub fn article(id: u64, updated_at: &str) -> BibliographicRecord {
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

/// A richly populated record exercising most crosswalk rules at once.
pub fn full_record() -> BibliographicRecord {
    serde_json::from_str(
        r#"{
            "publication_id": 339747,
            "title": "  Harvesting at Scale ",
            "alt_title": "A Field Study",
            "abstract": "On the harvesting of bibliographic metadata.",
            "publication_type_code": "publication_journal-article",
            "ref_value": "ISREF",
            "affiliated": true,
            "epub_ahead_of_print": true,
            "categories": [
                {"svep_id": 10201, "name_en": "Computer Sciences", "name_sv": "Datavetenskap"}
            ],
            "publication_identifiers": [
                {"identifier_code": "doi", "identifier_value": "10.1000/harvest"},
                {"identifier_code": "scopus-id", "identifier_value": "2-s2.0-1"}
            ],
            "authors": [
                {
                    "position": 1,
                    "person": {
                        "first_name": "Anna",
                        "last_name": "Andersson",
                        "year_of_birth": 1975,
                        "identifiers": [
                            {"type": "xkonto", "value": "xandan"},
                            {"type": "orcid", "value": "0000-0002-1825-0097"}
                        ]
                    },
                    "affiliations": [
                        {
                            "department_id": 1304,
                            "name_en": "School of Public Administration",
                            "name_sv": "Förvaltningshögskolan"
                        }
                    ]
                }
            ],
            "keywords": "metadata, harvesting, oai-pmh",
            "publanguage": "en",
            "pubyear": 2020,
            "publisher": "University Press",
            "place": "Gothenburg",
            "sourcetitle": "Journal of Metadata Studies",
            "sourcevolume": "12",
            "sourceissue": "3",
            "article_number": "e0100",
            "sourcepages": "123-145",
            "issn": "1234-5678",
            "eissn": "8765-4321",
            "series": [
                {"title": "Gothenburg Studies", "part": "7", "issn": "1111-2222"}
            ],
            "files": [
                {"accepted": true, "visible_after": null}
            ],
            "updated_at": "2020-06-01T12:00:00.500",
            "deleted": false
        }"#,
    )
    .unwrap()
}
