//! Dublin Core serialization of bibliographic records.
//!
//! The legacy `oai_dc` mapping: a simple 15-element schema kept alongside
//! MODS for harvesters that only understand Dublin Core. It shares the
//! record header, pagination, and sanitization rules with the MODS
//! crosswalk; only the body mapping differs.
//!
//! Two conversion approaches are provided:
//! - **Intermediate struct**: [`record_to_dublin_core()`] returns a
//!   [`DublinCoreRecord`] for programmatic access to the elements
//! - **Direct XML**: [`record_to_oai_dc_xml()`] converts straight to the
//!   `oai_dc` XML container in one call

use std::fmt::Write;

use crate::config::ProviderConfig;
use crate::crosswalk::sanitize;
use crate::error::{OaiError, Result};
use crate::record::BibliographicRecord;
use crate::vocabulary;

/// Dublin Core metadata record.
#[derive(Debug, Clone, Default)]
pub struct DublinCoreRecord {
    /// dc:title - Title of the resource
    pub title: Vec<String>,
    /// dc:creator - Entity responsible for the resource
    pub creator: Vec<String>,
    /// dc:subject - Topic of the resource
    pub subject: Vec<String>,
    /// dc:description - Account of the resource
    pub description: Vec<String>,
    /// dc:publisher - Entity responsible for making the resource available
    pub publisher: Vec<String>,
    /// dc:date - Point or period of time associated with the resource
    pub date: Vec<String>,
    /// dc:type - Nature or genre of the resource
    pub dc_type: Vec<String>,
    /// dc:identifier - Unambiguous reference to the resource
    pub identifier: Vec<String>,
    /// dc:source - Related resource from which the resource is derived
    pub source: Vec<String>,
    /// dc:language - Language of the resource
    pub language: Vec<String>,
}

/// Map a bibliographic record to Dublin Core elements.
///
/// # Errors
///
/// Returns [`OaiError::InvalidRecord`] when the title or publication-type
/// code is missing or empty.
pub fn record_to_dublin_core(
    record: &BibliographicRecord,
    config: &ProviderConfig,
) -> Result<DublinCoreRecord> {
    let title = sanitize(&record.title);
    if title.is_empty() {
        return Err(OaiError::InvalidRecord {
            id: record.id,
            reason: "empty title".to_string(),
        });
    }
    if record.publication_type_code.trim().is_empty() {
        return Err(OaiError::InvalidRecord {
            id: record.id,
            reason: "empty publication type code".to_string(),
        });
    }

    let mut dc = DublinCoreRecord::default();
    dc.title.push(title);
    if let Some(subtitle) = record.alt_title.as_deref().filter(|s| !s.is_empty()) {
        dc.title.push(sanitize(subtitle));
    }

    if let Some(authors) = record.authors.as_ref() {
        let mut authors: Vec<_> = authors.iter().collect();
        authors.sort_by_key(|author| author.position);
        for author in authors {
            dc.creator.push(format!(
                "{}, {}",
                sanitize(&author.person.last_name),
                sanitize(&author.person.first_name)
            ));
        }
    }

    if let Some(keywords) = record.keywords.as_deref().filter(|s| !s.is_empty()) {
        let keywords = sanitize(keywords);
        for keyword in keywords.split(',') {
            let keyword = keyword.trim();
            if !keyword.is_empty() {
                dc.subject.push(keyword.to_string());
            }
        }
    }
    for category in &record.categories {
        dc.subject.push(category.name_en.clone());
    }

    if let Some(text) = record.r#abstract.as_deref().filter(|s| !s.is_empty()) {
        dc.description.push(sanitize(text));
    }
    if let Some(publisher) = record.publisher.as_deref().filter(|s| !s.is_empty()) {
        dc.publisher.push(sanitize(publisher));
    }
    if let Some(pubyear) = record.pubyear {
        dc.date.push(pubyear.to_string());
    }

    let info = vocabulary::publication_type_info(
        &record.publication_type_code,
        record.ref_value.as_deref(),
    );
    dc.dc_type.push(info.output_type.to_string());

    dc.identifier.push(config.record_uri(record.id));
    for identifier in &record.publication_identifiers {
        let scheme = vocabulary::identifier_scheme(&identifier.identifier_code);
        dc.identifier
            .push(format!("{scheme}:{}", identifier.identifier_value));
    }

    if let Some(sourcetitle) = record.sourcetitle.as_deref().filter(|s| !s.is_empty()) {
        dc.source.push(sanitize(sourcetitle));
    }
    if let Some(raw) = record.publanguage.as_deref() {
        dc.language.push(vocabulary::language_code(raw).to_string());
    }

    Ok(dc)
}

/// Serialize a Dublin Core record to the `oai_dc` XML container.
#[must_use]
pub fn dublin_core_to_xml(dc: &DublinCoreRecord) -> String {
    let mut xml = String::from(
        "<oai_dc:dc xmlns:oai_dc=\"http://www.openarchives.org/OAI/2.0/oai_dc/\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"http://www.openarchives.org/OAI/2.0/oai_dc/ \
         http://www.openarchives.org/OAI/2.0/oai_dc.xsd\">\n",
    );

    let elements: [(&str, &[String]); 10] = [
        ("title", &dc.title),
        ("creator", &dc.creator),
        ("subject", &dc.subject),
        ("description", &dc.description),
        ("publisher", &dc.publisher),
        ("date", &dc.date),
        ("type", &dc.dc_type),
        ("identifier", &dc.identifier),
        ("source", &dc.source),
        ("language", &dc.language),
    ];
    for (name, values) in elements {
        for value in values {
            writeln!(xml, "  <dc:{name}>{}</dc:{name}>", escape_xml(value)).ok();
        }
    }

    xml.push_str("</oai_dc:dc>\n");
    xml
}

/// Convert a bibliographic record directly to `oai_dc` XML.
///
/// # Errors
///
/// Returns an error if the record fails the required-field checks of
/// [`record_to_dublin_core()`].
pub fn record_to_oai_dc_xml(
    record: &BibliographicRecord,
    config: &ProviderConfig,
) -> Result<String> {
    let dc = record_to_dublin_core(record, config)?;
    Ok(dublin_core_to_xml(&dc))
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
