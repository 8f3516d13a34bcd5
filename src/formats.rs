//! Supported metadata formats.
//!
//! The repository disseminates two formats: MODS 3.7 (the primary, detailed
//! crosswalk) and Dublin Core (`oai_dc`, the legacy simple mapping). A
//! request naming any other prefix fails with
//! [`CannotDisseminateFormat`](crate::error::OaiError::CannotDisseminateFormat)
//! before any store access.

use crate::error::{OaiError, Result};

/// Metadata prefix of the MODS format.
pub const MODS_PREFIX: &str = "mods";

/// Metadata prefix of the Dublin Core format.
pub const OAI_DC_PREFIX: &str = "oai_dc";

/// One disseminable metadata format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataFormat {
    /// Prefix carried in the `metadataPrefix` argument.
    pub prefix: &'static str,
    /// XML schema location.
    pub schema: &'static str,
    /// Metadata namespace.
    pub namespace: &'static str,
}

/// All formats this repository can disseminate.
pub const SUPPORTED_FORMATS: [MetadataFormat; 2] = [
    MetadataFormat {
        prefix: OAI_DC_PREFIX,
        schema: "http://www.openarchives.org/OAI/2.0/oai_dc.xsd",
        namespace: "http://www.openarchives.org/OAI/2.0/oai_dc/",
    },
    MetadataFormat {
        prefix: MODS_PREFIX,
        schema: "http://www.loc.gov/standards/mods/v3/mods-3-7.xsd",
        namespace: "http://www.loc.gov/mods/v3",
    },
];

/// Look up a supported format by prefix.
///
/// # Errors
///
/// Returns [`OaiError::CannotDisseminateFormat`] for unknown prefixes.
pub fn lookup(prefix: &str) -> Result<MetadataFormat> {
    SUPPORTED_FORMATS
        .iter()
        .find(|format| format.prefix == prefix)
        .copied()
        .ok_or_else(|| OaiError::CannotDisseminateFormat(prefix.to_string()))
}
