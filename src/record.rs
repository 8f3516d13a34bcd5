//! Bibliographic record model.
//!
//! [`BibliographicRecord`] is the read-only input entity produced and owned
//! by the backing store; the crosswalk never mutates it. All optional fields
//! are modelled as `Option` so that body elements become pure functions from
//! an optional field to zero-or-one XML nodes.
//!
//! [`RecordHeader`] and [`MetadataRecord`] form the output side: a header
//! (identifier, datestamp, set membership, deletion status) plus a
//! serialized descriptive-metadata body, created fresh per request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One bibliographic record as stored in the backing index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BibliographicRecord {
    /// Internal numeric identifier.
    #[serde(rename = "publication_id")]
    pub id: u64,
    /// Main title. Required; an empty title is a data-integrity fault.
    pub title: String,
    /// Subtitle, if any.
    #[serde(default)]
    pub alt_title: Option<String>,
    /// Abstract text.
    #[serde(default)]
    pub r#abstract: Option<String>,
    /// Publication-type code, e.g. `publication_journal-article`.
    /// Required; an empty code is a data-integrity fault.
    pub publication_type_code: String,
    /// Refereed indicator; `ISREF` marks a refereed book chapter.
    #[serde(default)]
    pub ref_value: Option<String>,
    /// Set when the record is a publication on artistic basis.
    #[serde(default)]
    pub artistic_basis: bool,
    /// Set when the record is affiliated with the institution.
    #[serde(default)]
    pub affiliated: bool,
    /// Set when the record is published electronically ahead of print.
    #[serde(default)]
    pub epub_ahead_of_print: bool,
    /// National subject categories.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Identifiers of record (DOI, ISBN, ISSN, handle, ...).
    #[serde(default)]
    pub publication_identifiers: Vec<PublicationIdentifier>,
    /// Authors with ordering positions.
    #[serde(default)]
    pub authors: Option<Vec<Author>>,
    /// Comma-separated free-text keywords.
    #[serde(default)]
    pub keywords: Option<String>,
    /// Language code as entered (two- or three-letter).
    #[serde(default)]
    pub publanguage: Option<String>,
    /// Publication year.
    #[serde(default)]
    pub pubyear: Option<i32>,
    /// Publisher name.
    #[serde(default)]
    pub publisher: Option<String>,
    /// Place of publication.
    #[serde(default)]
    pub place: Option<String>,
    /// Title of the host publication (journal, proceedings, ...).
    #[serde(default)]
    pub sourcetitle: Option<String>,
    /// Alternate venue title for works made public outside a source.
    #[serde(default)]
    pub made_public_in: Option<String>,
    /// Host volume.
    #[serde(default)]
    pub sourcevolume: Option<String>,
    /// Host issue.
    #[serde(default)]
    pub sourceissue: Option<String>,
    /// Article number within the host.
    #[serde(default)]
    pub article_number: Option<String>,
    /// Page range within the host, e.g. `123-145`.
    #[serde(default)]
    pub sourcepages: Option<String>,
    /// Host ISSN.
    #[serde(default)]
    pub issn: Option<String>,
    /// Host electronic ISSN.
    #[serde(default)]
    pub eissn: Option<String>,
    /// ISBN (of the record itself for monographs, of the host otherwise).
    #[serde(default)]
    pub isbn: Option<String>,
    /// Series memberships.
    #[serde(default)]
    pub series: Vec<SeriesEntry>,
    /// Deposited files.
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Last-update timestamp, `YYYY-MM-DDThh:mm:ss` with optional
    /// fractional seconds.
    pub updated_at: String,
    /// Set when the record has been withdrawn from the repository.
    #[serde(default)]
    pub deleted: bool,
}

/// National subject category with bilingual labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Numeric category code in the national classification.
    pub svep_id: u32,
    /// English label.
    pub name_en: String,
    /// Swedish label.
    pub name_sv: String,
}

impl Category {
    /// Localized label for a three-letter language code; Swedish for
    /// `swe`, English otherwise.
    #[must_use]
    pub fn label(&self, lang: &str) -> &str {
        if lang == "swe" {
            &self.name_sv
        } else {
            &self.name_en
        }
    }
}

/// Identifier of record, e.g. `{doi, 10.1000/xyz}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationIdentifier {
    /// Scheme code as stored (`doi`, `pubmed`, `handle`, ...).
    pub identifier_code: String,
    /// Identifier value.
    pub identifier_value: String,
}

/// One author entry: an ordering position plus the person it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Ordering position within the author list.
    pub position: u32,
    /// The person behind this authorship.
    pub person: Person,
    /// Departmental affiliations for this authorship.
    #[serde(default)]
    pub affiliations: Vec<Affiliation>,
}

/// A person with name parts and external identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Year of birth, when recorded.
    #[serde(default)]
    pub year_of_birth: Option<i32>,
    /// External person identifiers (`xkonto`, `orcid`, ...).
    #[serde(default)]
    pub identifiers: Vec<PersonIdentifier>,
}

impl Person {
    /// Value of the first identifier with the given scheme, if any.
    #[must_use]
    pub fn identifier_value(&self, scheme: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|identifier| identifier.r#type == scheme)
            .map(|identifier| identifier.value.as_str())
    }
}

/// External person identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIdentifier {
    /// Identifier scheme (`xkonto`, `orcid`, ...).
    pub r#type: String,
    /// Identifier value.
    pub value: String,
}

/// Departmental affiliation with bilingual names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Numeric department identifier.
    pub department_id: u32,
    /// English department name.
    pub name_en: String,
    /// Swedish department name.
    pub name_sv: String,
}

/// Series membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    /// Series title. Entries without a title are skipped by the crosswalk.
    #[serde(default)]
    pub title: Option<String>,
    /// Part number within the series.
    #[serde(default)]
    pub part: Option<String>,
    /// Series ISSN.
    #[serde(default)]
    pub issn: Option<String>,
}

/// A deposited file attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Whether the deposit has been accepted.
    pub accepted: bool,
    /// Embargo end date (`YYYY-MM-DD`); `None` means visible immediately.
    #[serde(default)]
    pub visible_after: Option<String>,
}

impl FileEntry {
    /// Whether this file is viewable on `today`: accepted, and either
    /// unembargoed or past its embargo date. Unparsable embargo dates
    /// count as not yet visible.
    #[must_use]
    pub fn is_viewable(&self, today: NaiveDate) -> bool {
        if !self.accepted {
            return false;
        }
        match &self.visible_after {
            None => true,
            Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(|visible| visible <= today)
                .unwrap_or(false),
        }
    }
}

impl BibliographicRecord {
    /// Whether at least one attached file is viewable on `today`.
    #[must_use]
    pub fn has_viewable_file(&self, today: NaiveDate) -> bool {
        self.files.iter().any(|file| file.is_viewable(today))
    }

    /// Number of authors; 0 when the author list is absent.
    #[must_use]
    pub fn author_count(&self) -> usize {
        self.authors.as_ref().map_or(0, Vec::len)
    }
}

/// Record header of one OAI-PMH record: identity, datestamp, set
/// membership, and deletion status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeader {
    /// Externally visible identifier, `{identifier_prefix}/{id}`.
    pub identifier: String,
    /// Update instant, second precision, UTC, `Z` suffix.
    pub datestamp: String,
    /// Sets this record belongs to.
    pub set_specs: Vec<String>,
    /// Whether the record is marked deleted.
    pub deleted: bool,
}

/// One harvested record: header plus serialized metadata body.
///
/// The body is a complete XML document fragment in the requested metadata
/// format, ready for embedding by the enclosing response serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Record header.
    pub header: RecordHeader,
    /// Serialized descriptive-metadata body. Empty for deleted records,
    /// which carry a header only.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_visibility() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let open = FileEntry {
            accepted: true,
            visible_after: None,
        };
        let embargoed = FileEntry {
            accepted: true,
            visible_after: Some("2030-01-01".to_string()),
        };
        let released = FileEntry {
            accepted: true,
            visible_after: Some("2024-06-01".to_string()),
        };
        let rejected = FileEntry {
            accepted: false,
            visible_after: None,
        };
        assert!(open.is_viewable(today));
        assert!(!embargoed.is_viewable(today));
        assert!(released.is_viewable(today));
        assert!(!rejected.is_viewable(today));
    }

    #[test]
    fn test_unparsable_embargo_date_is_not_visible() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let file = FileEntry {
            accepted: true,
            visible_after: Some("soon".to_string()),
        };
        assert!(!file.is_viewable(today));
    }

    #[test]
    fn test_person_identifier_lookup() {
        let person = Person {
            first_name: "Anna".to_string(),
            last_name: "Svensson".to_string(),
            year_of_birth: None,
            identifiers: vec![
                PersonIdentifier {
                    r#type: "xkonto".to_string(),
                    value: "xsvena".to_string(),
                },
                PersonIdentifier {
                    r#type: "orcid".to_string(),
                    value: "0000-0002-1825-0097".to_string(),
                },
            ],
        };
        assert_eq!(person.identifier_value("xkonto"), Some("xsvena"));
        assert_eq!(person.identifier_value("orcid"), Some("0000-0002-1825-0097"));
        assert_eq!(person.identifier_value("scopus"), None);
    }

    #[test]
    fn test_record_deserializes_with_minimal_fields() {
        let json = r#"{
            "publication_id": 1,
            "title": "A title",
            "publication_type_code": "publication_journal-article",
            "updated_at": "2024-01-01T00:00:00"
        }"#;
        let record: BibliographicRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.author_count(), 0);
        assert!(!record.deleted);
        assert!(record.categories.is_empty());
    }
}
