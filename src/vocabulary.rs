//! Controlled-vocabulary tables for the metadata crosswalk.
//!
//! All tables are static immutable lookups built once at first use. They
//! cover publication-type genre mapping, contributor role codes, language
//! code normalization, identifier-scheme codes, and the fixed publication
//! type sets (monographs, artistic works) that drive conditional crosswalk
//! rules.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

/// Genre pair for one publication type: SVEP content type and
/// kb.se output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationTypeInfo {
    /// SVEP content-type code (`ref`, `vet`, or `pop`).
    pub content_type: &'static str,
    /// kb.se output-type path, e.g. `publication/journal-article`.
    pub output_type: &'static str,
}

/// Institution source code carried in `recordInfo` and the set spec for
/// affiliated records.
pub const INSTITUTION_CODE: &str = "gu";

/// Institution authority domain used for department-level affiliations.
pub const INSTITUTION_AUTHORITY: &str = "gu.se";

/// National authority used for the institution-level affiliation line.
pub const NATIONAL_AUTHORITY: &str = "kb.se";

/// Institution name in Swedish.
pub const INSTITUTION_NAME_SV: &str = "Göteborgs universitet";

/// Institution name in English.
pub const INSTITUTION_NAME_EN: &str = "Gothenburg University";

/// Subject languages emitted for category subjects, in emission order.
pub const SUBJECT_LANGUAGES: [&str; 2] = ["eng", "swe"];

/// Refereed indicator value that switches a book chapter to content type
/// `ref`.
pub const REFEREED_INDICATOR: &str = "ISREF";

lazy_static! {
    /// Publication type → content/output genre pair.
    pub static ref PUBLICATION_TYPES: HashMap<&'static str, PublicationTypeInfo> = {
        let mut m = HashMap::new();
        let mut add = |code, content_type, output_type| {
            m.insert(code, PublicationTypeInfo { content_type, output_type });
        };
        add("conference_other", "vet", "conference/other");
        add("conference_paper", "ref", "conference/paper");
        add("conference_poster", "vet", "conference/poster");
        add("conference_proceeding", "vet", "conference/proceeding");
        add("intellectual-property_patent", "vet", "intellectual-property/patent");
        add("publication_journal-article", "ref", "publication/journal-article");
        add("publication_magazine-article", "vet", "publication/magazine-article");
        add("publication_newspaper-article", "pop", "publication/newspaper-article");
        add("publication_edited-book", "vet", "publication/edited-book");
        add("publication_book", "vet", "publication/book");
        add("publication_textbook", "vet", "publication/book");
        add("publication_book-chapter", "vet", "publication/book-chapter");
        add("publication_book-review", "vet", "publication/book-review");
        add("publication_report", "vet", "publication/report");
        add("publication_report-chapter", "vet", "publication/report-chapter");
        add("publication_doctoral-thesis", "vet", "publication/doctoral-thesis");
        add("publication_licentiate-thesis", "vet", "publication/licentiate-thesis");
        add("publication_review-article", "ref", "publication/review-article");
        add("publication_textcritical-edition", "vet", "publication/critical-edition");
        add("publication_editorial-letter", "vet", "publication/editorial-letter");
        add("publication_encyclopedia-entry", "vet", "publication/encyclopedia-entry");
        add("publication_journal-issue", "vet", "publication/journal-issue");
        add("publication_working-paper", "vet", "publication/working-paper");
        add("artistic-work_scientific_and_development", "vet", "artistic-work");
        add(
            "artistic-work_original-creative-work",
            "vet",
            "artistic-work/original-creative-work",
        );
        add("other", "vet", "publication/other");
        m
    };

    /// Publication types treated as monographs: ISBN on the record itself,
    /// no host related item.
    pub static ref MONOGRAPH_TYPES: HashSet<&'static str> = [
        "publication_book",
        "publication_edited-book",
        "publication_report",
        "publication_doctoral-thesis",
        "publication_licentiate-thesis",
    ]
    .into_iter()
    .collect();

    /// Publication types whose resource type is `mixed material`.
    pub static ref ARTISTIC_TYPES: HashSet<&'static str> = [
        "artistic-work_scientific_and_development",
        "artistic-work_original-creative-work",
    ]
    .into_iter()
    .collect();

    /// Publication types whose contributors act as editors rather than
    /// authors.
    pub static ref EDITOR_TYPES: HashSet<&'static str> = [
        "publication_edited-book",
        "publication_textcritical-edition",
        "publication_journal-issue",
        "conference_proceeding",
    ]
    .into_iter()
    .collect();

    /// Placeholder department ids that do not count as a real affiliation.
    pub static ref EXCLUDED_DEPARTMENTS: HashSet<u32> = [666, 667].into_iter().collect();

    /// Identifier scheme code translation. Unrecognized schemes pass
    /// through unchanged.
    pub static ref IDENTIFIER_SCHEMES: HashMap<&'static str, &'static str> = [
        ("isi-id", "isi"),
        ("pubmed", "pmid"),
        ("handle", "hdl"),
        ("doi", "doi"),
        ("scopus-id", "scopus"),
        ("libris-id", "se-libr"),
    ]
    .into_iter()
    .collect();

    /// Two- and three-letter language code → ISO 639-2b code.
    pub static ref LANGUAGE_CODES: HashMap<&'static str, &'static str> = [
        ("en", "eng"), ("eng", "eng"),
        ("sv", "swe"), ("swe", "swe"),
        ("ar", "ara"), ("ara", "ara"),
        ("bs", "bos"), ("bos", "bos"),
        ("bg", "bul"), ("bul", "bul"),
        ("zh", "chi"), ("chi", "chi"),
        ("hr", "hrv"), ("hrv", "hrv"),
        ("cs", "cze"), ("cze", "cze"),
        ("da", "dan"), ("dan", "dan"),
        ("nl", "dut"), ("dut", "dut"),
        ("fi", "fin"), ("fin", "fin"),
        ("fr", "fre"), ("fre", "fre"),
        ("de", "ger"), ("ger", "ger"),
        ("el", "gre"), ("gre", "gre"),
        ("he", "heb"), ("heb", "heb"),
        ("hu", "hun"), ("hun", "hun"),
        ("is", "ice"), ("ice", "ice"),
        ("it", "ita"), ("ita", "ita"),
        ("ja", "jpn"), ("jpn", "jpn"),
        ("ko", "kor"), ("kor", "kor"),
        ("la", "lat"), ("lat", "lat"),
        ("lv", "lav"), ("lav", "lav"),
        ("no", "nor"), ("nor", "nor"),
        ("pl", "pol"), ("pol", "pol"),
        ("pt", "por"), ("por", "por"),
        ("ro", "rum"), ("rum", "rum"),
        ("ru", "rus"), ("rus", "rus"),
        ("sr", "srp"), ("srp", "srp"),
        ("sk", "slo"), ("slo", "slo"),
        ("sl", "slv"), ("slv", "slv"),
        ("es", "spa"), ("spa", "spa"),
        ("tr", "tur"), ("tur", "tur"),
        ("uk", "ukr"), ("ukr", "ukr"),
    ]
    .into_iter()
    .collect();
}

/// Genre pair for a publication type, with the refereed-indicator override
/// for book chapters. Unknown types fall back to `{vet, publication/other}`.
#[must_use]
pub fn publication_type_info(
    publication_type_code: &str,
    ref_value: Option<&str>,
) -> PublicationTypeInfo {
    let mut info = PUBLICATION_TYPES
        .get(publication_type_code)
        .copied()
        .unwrap_or(PublicationTypeInfo {
            content_type: "vet",
            output_type: "publication/other",
        });
    if publication_type_code == "publication_book-chapter" {
        info.content_type = if ref_value == Some(REFEREED_INDICATOR) {
            "ref"
        } else {
            "vet"
        };
    }
    info
}

/// Whether a publication type belongs to the monograph set.
#[must_use]
pub fn is_monograph(publication_type_code: &str) -> bool {
    MONOGRAPH_TYPES.contains(publication_type_code)
}

/// marcrelator role code for contributors of a publication type:
/// `edt` for editor-driven types, `aut` otherwise.
#[must_use]
pub fn role_code(publication_type_code: &str) -> &'static str {
    if EDITOR_TYPES.contains(publication_type_code) {
        "edt"
    } else {
        "aut"
    }
}

/// ISO 639-2b code for a raw language code; `und` when unrecognized.
#[must_use]
pub fn language_code(raw: &str) -> &'static str {
    LANGUAGE_CODES.get(raw).copied().unwrap_or("und")
}

/// Translated identifier scheme code; unrecognized schemes pass through.
#[must_use]
pub fn identifier_scheme<'a>(raw: &'a str) -> &'a str {
    IDENTIFIER_SCHEMES.get(raw).copied().unwrap_or(raw)
}

/// Resource type for a publication type: `mixed material` for artistic
/// works, `text` otherwise.
#[must_use]
pub fn type_of_resource(publication_type_code: &str) -> &'static str {
    if ARTISTIC_TYPES.contains(publication_type_code) {
        "mixed material"
    } else {
        "text"
    }
}
