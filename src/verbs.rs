//! Protocol verbs and the generic argument validator.
//!
//! Every verb declares its required arguments, optional arguments, and at
//! most one exclusive argument in a single constraint table; the validator
//! checks a request's argument set generically against that table before
//! any store access is attempted.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{OaiError, Result};

/// The six OAI-PMH protocol verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Repository self-description.
    Identify,
    /// Enumerate disseminable metadata formats.
    ListMetadataFormats,
    /// Enumerate the set hierarchy.
    ListSets,
    /// Enumerate record headers under filters.
    ListIdentifiers,
    /// Enumerate full records under filters.
    ListRecords,
    /// Fetch one record by identifier.
    GetRecord,
}

impl Verb {
    /// Argument constraints for this verb.
    #[must_use]
    pub fn constraints(self) -> &'static VerbConstraints {
        match self {
            Verb::Identify => &VerbConstraints {
                required: &[],
                optional: &[],
                exclusive: None,
            },
            Verb::ListMetadataFormats => &VerbConstraints {
                required: &[],
                optional: &["identifier"],
                exclusive: None,
            },
            Verb::ListSets => &VerbConstraints {
                required: &[],
                optional: &[],
                exclusive: Some("resumptionToken"),
            },
            Verb::ListIdentifiers | Verb::ListRecords => &VerbConstraints {
                required: &["metadataPrefix"],
                optional: &["from", "until", "set"],
                exclusive: Some("resumptionToken"),
            },
            Verb::GetRecord => &VerbConstraints {
                required: &["identifier", "metadataPrefix"],
                optional: &[],
                exclusive: None,
            },
        }
    }
}

impl FromStr for Verb {
    type Err = OaiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Identify" => Ok(Verb::Identify),
            "ListMetadataFormats" => Ok(Verb::ListMetadataFormats),
            "ListSets" => Ok(Verb::ListSets),
            "ListIdentifiers" => Ok(Verb::ListIdentifiers),
            "ListRecords" => Ok(Verb::ListRecords),
            "GetRecord" => Ok(Verb::GetRecord),
            other => Err(OaiError::BadVerb(other.to_string())),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Identify => "Identify",
            Verb::ListMetadataFormats => "ListMetadataFormats",
            Verb::ListSets => "ListSets",
            Verb::ListIdentifiers => "ListIdentifiers",
            Verb::ListRecords => "ListRecords",
            Verb::GetRecord => "GetRecord",
        };
        f.write_str(name)
    }
}

/// Argument contract of one verb.
#[derive(Debug, Clone, Copy)]
pub struct VerbConstraints {
    /// Arguments that must be present when the exclusive argument is absent.
    pub required: &'static [&'static str],
    /// Arguments that may be present.
    pub optional: &'static [&'static str],
    /// Argument that, when present, must be the only one.
    pub exclusive: Option<&'static str>,
}

/// Validate a request's argument set against its verb's constraints.
///
/// `args` maps argument names to values, excluding the `verb` argument
/// itself. Pure validation gate; no side effects, no store access.
///
/// # Errors
///
/// Returns [`OaiError::BadArgument`] when the exclusive argument is
/// accompanied by any other argument, when a required argument is missing,
/// or when an argument outside required ∪ optional is present.
pub fn validate_arguments(verb: Verb, args: &HashMap<String, String>) -> Result<()> {
    let constraints = verb.constraints();

    if let Some(exclusive) = constraints.exclusive {
        if args.contains_key(exclusive) {
            if args.len() > 1 {
                return Err(OaiError::BadArgument(format!(
                    "{exclusive} is an exclusive argument for {verb}"
                )));
            }
            return Ok(());
        }
    }

    for required in constraints.required {
        if !args.contains_key(*required) {
            return Err(OaiError::BadArgument(format!(
                "missing required argument {required} for {verb}"
            )));
        }
    }
    for name in args.keys() {
        let known = constraints.required.contains(&name.as_str())
            || constraints.optional.contains(&name.as_str());
        if !known {
            return Err(OaiError::BadArgument(format!(
                "illegal argument {name} for {verb}"
            )));
        }
    }
    Ok(())
}
