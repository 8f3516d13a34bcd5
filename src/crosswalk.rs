//! MODS crosswalk of bibliographic records.
//!
//! This module maps one [`BibliographicRecord`] into a MODS 3.7 XML
//! document plus its record header. The mapping is a deterministic, total
//! function of the record, the static vocabulary tables, and the provider
//! configuration: every optional input field is guarded, so a record
//! missing all optional fields still produces a valid minimal document.
//!
//! Body element order follows the canonical crosswalk:
//! record info, identifiers, title, abstract, categories, keyword
//! subjects, language, genre, names, notes, origin info, host related
//! item, series, location, physical description, type of resource.
//!
//! Missing *required* fields (title, publication-type code) are
//! data-integrity faults for that one record and surface as
//! [`OaiError::InvalidRecord`]; pagination logs and skips such records
//! rather than truncating the page.

use std::fmt::Write;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ProviderConfig;
use crate::error::{OaiError, Result};
use crate::formats;
use crate::query::parse_timestamp;
use crate::record::{Author, BibliographicRecord, MetadataRecord, RecordHeader};
use crate::vocabulary;

lazy_static! {
    /// A page range splittable into a start/end extent: digits separated
    /// by a hyphen or en-dash, optional surrounding whitespace.
    static ref PAGE_RANGE: Regex = Regex::new(r"^\s*(\d+)\s*[-–]\s*(\d+)\s*$").expect("valid regex");
}

/// Build the record header: external identifier, normalized datestamp,
/// set membership, and deletion status.
///
/// # Errors
///
/// Returns [`OaiError::InvalidRecord`] when the update timestamp cannot
/// be parsed.
pub fn build_header(record: &BibliographicRecord, config: &ProviderConfig) -> Result<RecordHeader> {
    let set_specs = if record.affiliated {
        vec![vocabulary::INSTITUTION_CODE.to_string()]
    } else {
        Vec::new()
    };
    Ok(RecordHeader {
        identifier: config.external_identifier(record.id),
        datestamp: format_datestamp(record)?,
        set_specs,
        deleted: record.deleted,
    })
}

/// Normalize the record update timestamp to `YYYY-MM-DDThh:mm:ssZ`
/// (second precision, UTC). Accepts input with or without fractional
/// seconds.
fn format_datestamp(record: &BibliographicRecord) -> Result<String> {
    let instant = parse_timestamp(&record.updated_at).ok_or_else(|| OaiError::InvalidRecord {
        id: record.id,
        reason: format!("unparsable update timestamp: {}", record.updated_at),
    })?;
    Ok(instant.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Crosswalk one record into the requested metadata format.
///
/// Deleted records carry a header only; their body is empty.
///
/// # Errors
///
/// Returns [`OaiError::InvalidRecord`] for data-integrity faults and
/// [`OaiError::CannotDisseminateFormat`] for unknown prefixes.
pub fn crosswalk_record(
    record: &BibliographicRecord,
    config: &ProviderConfig,
    metadata_prefix: &str,
) -> Result<MetadataRecord> {
    let format = formats::lookup(metadata_prefix)?;
    let header = build_header(record, config)?;
    let body = if record.deleted {
        String::new()
    } else if format.prefix == formats::MODS_PREFIX {
        record_to_mods_xml(record, config)?
    } else {
        crate::dublin_core::record_to_oai_dc_xml(record, config)?
    };
    Ok(MetadataRecord { header, body })
}

/// Convert a bibliographic record to MODS 3.7 XML.
///
/// # Errors
///
/// Returns [`OaiError::InvalidRecord`] when a required field (title,
/// publication-type code) is missing or empty.
pub fn record_to_mods_xml(record: &BibliographicRecord, config: &ProviderConfig) -> Result<String> {
    mods_xml_on(record, config, chrono::Utc::now().date_naive())
}

/// MODS serialization with an explicit "today" for file-visibility checks.
/// Split out so tests can pin the clock.
pub(crate) fn mods_xml_on(
    record: &BibliographicRecord,
    config: &ProviderConfig,
    today: NaiveDate,
) -> Result<String> {
    check_required_fields(record)?;

    let mut xml = String::from(
        "<mods xmlns=\"http://www.loc.gov/mods/v3\" \
         xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"http://www.loc.gov/mods/v3 \
         http://www.loc.gov/standards/mods/v3/mods-3-7.xsd\" version=\"3.7\">\n",
    );

    write_record_info(&mut xml);
    write_identifiers(&mut xml, record, config);
    write_title(&mut xml, record);
    write_abstract(&mut xml, record);
    write_categories(&mut xml, record);
    write_keyword_subjects(&mut xml, record);
    write_language(&mut xml, record);
    write_genre(&mut xml, record);
    write_names(&mut xml, record);
    write_notes(&mut xml, record);
    write_origin_info(&mut xml, record);
    write_related_item(&mut xml, record);
    write_series(&mut xml, record);
    write_location(&mut xml, record, config, today);
    write_physical_description(&mut xml, record, today);
    write_type_of_resource(&mut xml, record);

    xml.push_str("</mods>\n");
    Ok(xml)
}

/// A missing required field indicates a malformed upstream record; fatal
/// for this record only.
fn check_required_fields(record: &BibliographicRecord) -> Result<()> {
    if sanitize(&record.title).is_empty() {
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
    Ok(())
}

fn write_record_info(xml: &mut String) {
    writeln!(
        xml,
        "  <recordInfo>\n    <recordContentSource>{}</recordContentSource>\n  </recordInfo>",
        vocabulary::INSTITUTION_CODE
    )
    .ok();
}

fn write_identifiers(xml: &mut String, record: &BibliographicRecord, config: &ProviderConfig) {
    writeln!(
        xml,
        "  <identifier type=\"uri\">{}</identifier>",
        escape_xml(&config.record_uri(record.id))
    )
    .ok();

    // ISBN on the record itself only for monograph types.
    if vocabulary::is_monograph(&record.publication_type_code) {
        if let Some(isbn) = non_empty(record.isbn.as_deref()) {
            writeln!(
                xml,
                "  <identifier type=\"isbn\">{}</identifier>",
                escape_xml(isbn)
            )
            .ok();
        }
    }

    for identifier in &record.publication_identifiers {
        let scheme = vocabulary::identifier_scheme(&identifier.identifier_code);
        writeln!(
            xml,
            "  <identifier type=\"{}\">{}</identifier>",
            escape_xml(scheme),
            escape_xml(&identifier.identifier_value)
        )
        .ok();
    }
}

fn write_title(xml: &mut String, record: &BibliographicRecord) {
    xml.push_str("  <titleInfo>\n");
    writeln!(xml, "    <title>{}</title>", escape_xml(&sanitize(&record.title))).ok();
    if let Some(subtitle) = non_empty(record.alt_title.as_deref()) {
        writeln!(
            xml,
            "    <subTitle>{}</subTitle>",
            escape_xml(&sanitize(subtitle))
        )
        .ok();
    }
    xml.push_str("  </titleInfo>\n");
}

fn write_abstract(xml: &mut String, record: &BibliographicRecord) {
    if let Some(text) = non_empty(record.r#abstract.as_deref()) {
        writeln!(xml, "  <abstract>{}</abstract>", escape_xml(&sanitize(text))).ok();
    }
}

fn write_categories(xml: &mut String, record: &BibliographicRecord) {
    for category in &record.categories {
        writeln!(
            xml,
            "  <classification authority=\"ssif\">\n    <topic>{}</topic>\n  </classification>",
            category.svep_id
        )
        .ok();
    }
    for category in &record.categories {
        for lang in vocabulary::SUBJECT_LANGUAGES {
            writeln!(
                xml,
                "  <subject lang=\"{lang}\" authority=\"uka.se\" xlink:href=\"{}\">\n    \
                 <topic>{}</topic>\n  </subject>",
                category.svep_id,
                escape_xml(category.label(lang))
            )
            .ok();
        }
    }
}

fn write_keyword_subjects(xml: &mut String, record: &BibliographicRecord) {
    if let Some(keywords) = non_empty(record.keywords.as_deref()) {
        let keywords = sanitize(keywords);
        for keyword in keywords.split(',') {
            writeln!(
                xml,
                "  <subject>\n    <topic>{}</topic>\n  </subject>",
                escape_xml(keyword.trim())
            )
            .ok();
        }
    }
}

fn write_language(xml: &mut String, record: &BibliographicRecord) {
    if let Some(raw) = record.publanguage.as_deref() {
        let code = vocabulary::language_code(raw);
        writeln!(
            xml,
            "  <language>\n    <languageTerm type=\"code\" authority=\"iso639-2b\">{code}\
             </languageTerm>\n  </language>"
        )
        .ok();
    }
}

fn write_genre(xml: &mut String, record: &BibliographicRecord) {
    let info = vocabulary::publication_type_info(
        &record.publication_type_code,
        record.ref_value.as_deref(),
    );
    writeln!(
        xml,
        "  <genre authority=\"kb.se\" type=\"outputType\">{}</genre>",
        info.output_type
    )
    .ok();
    if record.artistic_basis {
        xml.push_str("  <genre authority=\"kb.se\" type=\"outputType\">artistic-work</genre>\n");
    }
    writeln!(
        xml,
        "  <genre authority=\"svep\" type=\"contentType\">{}</genre>",
        info.content_type
    )
    .ok();
}

fn write_names(xml: &mut String, record: &BibliographicRecord) {
    let Some(authors) = record.authors.as_ref() else {
        return;
    };
    let mut authors: Vec<&Author> = authors.iter().collect();
    authors.sort_by_key(|author| author.position);

    let role_code = vocabulary::role_code(&record.publication_type_code);
    for author in authors {
        write_name(xml, author, role_code);
    }
}

fn write_name(xml: &mut String, author: &Author, role_code: &str) {
    let person = &author.person;
    let xkonto = person.identifier_value("xkonto");

    if xkonto.is_some() {
        writeln!(
            xml,
            "  <name type=\"personal\" authority=\"{}\">",
            vocabulary::INSTITUTION_CODE
        )
        .ok();
    } else {
        xml.push_str("  <name type=\"personal\">\n");
    }

    writeln!(
        xml,
        "    <namePart type=\"given\">{}</namePart>",
        escape_xml(&sanitize(&person.first_name))
    )
    .ok();
    writeln!(
        xml,
        "    <namePart type=\"family\">{}</namePart>",
        escape_xml(&sanitize(&person.last_name))
    )
    .ok();
    if let Some(year) = person.year_of_birth {
        writeln!(xml, "    <namePart type=\"date\">{year}</namePart>").ok();
    }

    writeln!(
        xml,
        "    <role>\n      <roleTerm type=\"code\" authority=\"marcrelator\">{role_code}\
         </roleTerm>\n    </role>"
    )
    .ok();

    if let Some(xkonto) = xkonto {
        writeln!(
            xml,
            "    <nameIdentifier type=\"{}\">{}</nameIdentifier>",
            vocabulary::INSTITUTION_CODE,
            escape_xml(xkonto)
        )
        .ok();
    }
    if let Some(orcid) = person.identifier_value("orcid") {
        writeln!(
            xml,
            "    <nameIdentifier type=\"orcid\">{}</nameIdentifier>",
            escape_xml(orcid)
        )
        .ok();
    }

    write_affiliations(xml, author);
    xml.push_str("  </name>\n");
}

/// An author counts as affiliated only if at least one affiliation carries
/// a department id outside the excluded placeholder set.
fn is_author_affiliated(author: &Author) -> bool {
    author
        .affiliations
        .iter()
        .any(|affiliation| !vocabulary::EXCLUDED_DEPARTMENTS.contains(&affiliation.department_id))
}

fn write_affiliations(xml: &mut String, author: &Author) {
    if !is_author_affiliated(author) {
        return;
    }

    let institution = [
        ("swe", vocabulary::INSTITUTION_NAME_SV),
        ("eng", vocabulary::INSTITUTION_NAME_EN),
    ];
    for (lang, name) in institution {
        writeln!(
            xml,
            "    <affiliation lang=\"{lang}\" authority=\"{}\" \
             xsi:type=\"mods:stringPlusLanguagePlusAuthority\" valueURI=\"{}\">{}</affiliation>",
            vocabulary::NATIONAL_AUTHORITY,
            vocabulary::INSTITUTION_AUTHORITY,
            escape_xml(name)
        )
        .ok();
    }
    for affiliation in &author.affiliations {
        let localized = [
            ("swe", affiliation.name_sv.as_str()),
            ("eng", affiliation.name_en.as_str()),
        ];
        for (lang, name) in localized {
            writeln!(
                xml,
                "    <affiliation lang=\"{lang}\" authority=\"{authority}\" \
                 xsi:type=\"mods:stringPlusLanguagePlusAuthority\" \
                 valueURI=\"{authority}/{department}\">{name}</affiliation>",
                authority = vocabulary::INSTITUTION_AUTHORITY,
                department = affiliation.department_id,
                name = escape_xml(&sanitize(name))
            )
            .ok();
        }
    }
}

fn write_notes(xml: &mut String, record: &BibliographicRecord) {
    let status = if record.epub_ahead_of_print {
        "Epub ahead of print"
    } else {
        "Published"
    };
    writeln!(xml, "  <note type=\"publicationStatus\">{status}</note>").ok();
    writeln!(
        xml,
        "  <note type=\"creatorCount\">{}</note>",
        record.author_count()
    )
    .ok();
}

fn write_origin_info(xml: &mut String, record: &BibliographicRecord) {
    let publisher = non_empty(record.publisher.as_deref());
    let place = non_empty(record.place.as_deref());
    if record.pubyear.is_none() && publisher.is_none() && place.is_none() {
        return;
    }

    xml.push_str("  <originInfo>\n");
    if let Some(pubyear) = record.pubyear {
        writeln!(xml, "    <dateIssued>{pubyear}</dateIssued>").ok();
    }
    if let Some(publisher) = publisher {
        writeln!(
            xml,
            "    <publisher>{}</publisher>",
            escape_xml(&sanitize(publisher))
        )
        .ok();
    }
    if let Some(place) = place {
        writeln!(
            xml,
            "    <place>\n      <placeTerm>{}</placeTerm>\n    </place>",
            escape_xml(&sanitize(place))
        )
        .ok();
    }
    xml.push_str("  </originInfo>\n");
}

fn write_related_item(xml: &mut String, record: &BibliographicRecord) {
    // Host context applies to serial contributions only.
    if vocabulary::is_monograph(&record.publication_type_code) {
        return;
    }
    let sourcetitle = non_empty(record.sourcetitle.as_deref());
    let made_public_in = non_empty(record.made_public_in.as_deref());
    if sourcetitle.is_none() && made_public_in.is_none() {
        return;
    }

    xml.push_str("  <relatedItem type=\"host\">\n");
    for title in [sourcetitle, made_public_in].into_iter().flatten() {
        writeln!(
            xml,
            "    <titleInfo>\n      <title>{}</title>\n    </titleInfo>",
            escape_xml(&sanitize(title))
        )
        .ok();
    }

    for (scheme, value) in [
        ("issn", record.issn.as_deref()),
        ("issn", record.eissn.as_deref()),
        ("isbn", record.isbn.as_deref()),
    ] {
        if let Some(value) = non_empty(value) {
            writeln!(
                xml,
                "    <identifier type=\"{scheme}\">{}</identifier>",
                escape_xml(&sanitize(value))
            )
            .ok();
        }
    }

    write_part(xml, record);
    xml.push_str("  </relatedItem>\n");
}

fn write_part(xml: &mut String, record: &BibliographicRecord) {
    let volume = non_empty(record.sourcevolume.as_deref());
    let issue = non_empty(record.sourceissue.as_deref());
    let article_number = non_empty(record.article_number.as_deref());
    let pages = non_empty(record.sourcepages.as_deref());
    if volume.is_none() && issue.is_none() && article_number.is_none() && pages.is_none() {
        return;
    }

    xml.push_str("    <part>\n");
    for (detail_type, value) in [("volume", volume), ("issue", issue), ("artNo", article_number)] {
        if let Some(value) = value {
            writeln!(
                xml,
                "      <detail type=\"{detail_type}\">\n        <number>{}</number>\n      </detail>",
                escape_xml(&sanitize(value))
            )
            .ok();
        }
    }
    if let Some(pages) = pages {
        match parse_page_range(pages) {
            Some((start, end)) => {
                writeln!(
                    xml,
                    "      <extent>\n        <start>{start}</start>\n        <end>{end}</end>\n      </extent>"
                )
                .ok();
            }
            None => {
                writeln!(
                    xml,
                    "      <detail type=\"citation\">\n        <caption>{}</caption>\n      </detail>",
                    escape_xml(&sanitize(pages))
                )
                .ok();
            }
        }
    }
    xml.push_str("    </part>\n");
}

/// Split a page range into start and end pages. Accepts digits separated
/// by a hyphen or en-dash with optional whitespace; anything else is
/// unparseable and rendered as a free-text citation instead.
#[must_use]
pub fn parse_page_range(pages: &str) -> Option<(String, String)> {
    let sanitized = sanitize(pages);
    let captures = PAGE_RANGE.captures(&sanitized)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}

fn write_series(xml: &mut String, record: &BibliographicRecord) {
    for entry in &record.series {
        // Entries lacking a title are skipped.
        let Some(title) = non_empty(entry.title.as_deref()) else {
            continue;
        };
        xml.push_str("  <relatedItem type=\"series\">\n");
        xml.push_str("    <titleInfo>\n");
        writeln!(xml, "      <title>{}</title>", escape_xml(&sanitize(title))).ok();
        if let Some(part) = non_empty(entry.part.as_deref()) {
            writeln!(xml, "      <partNumber>{}</partNumber>", escape_xml(part)).ok();
        }
        xml.push_str("    </titleInfo>\n");
        if let Some(issn) = non_empty(entry.issn.as_deref()) {
            writeln!(xml, "    <identifier type=\"issn\">{}</identifier>", escape_xml(issn)).ok();
        }
        xml.push_str("  </relatedItem>\n");
    }
}

fn write_location(
    xml: &mut String,
    record: &BibliographicRecord,
    config: &ProviderConfig,
    today: NaiveDate,
) {
    if record.has_viewable_file(today) {
        writeln!(
            xml,
            "  <location>\n    <url note=\"free\" usage=\"primary\" displayLabel=\"FULLTEXT\">{}\
             </url>\n  </location>",
            escape_xml(&config.record_uri(record.id))
        )
        .ok();
    }
}

fn write_physical_description(xml: &mut String, record: &BibliographicRecord, today: NaiveDate) {
    if record.has_viewable_file(today) {
        xml.push_str(
            "  <physicalDescription>\n    <form authority=\"marcform\">electronic</form>\n  \
             </physicalDescription>\n",
        );
    }
}

fn write_type_of_resource(xml: &mut String, record: &BibliographicRecord) {
    writeln!(
        xml,
        "  <typeOfResource>{}</typeOfResource>",
        vocabulary::type_of_resource(&record.publication_type_code)
    )
    .ok();
}

/// Pass through an optional string only when it has visible content:
/// `None` and whitespace-only values both collapse to `None`.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Strip non-printable characters (except newline and carriage return)
/// from free text, then trim surrounding whitespace.
#[must_use]
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\r')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Escape XML special characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
