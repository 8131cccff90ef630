//! Core type definitions for the versioned database layout.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GpsError;

/// Generation of the database table layout and rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// First-generation layout.
    V1,
    /// Second-generation layout with repeat-aware duplicates and cross-table checks.
    V2,
}

impl SchemaVersion {
    /// Numeric form used on the command line.
    pub fn number(&self) -> u8 {
        match self {
            SchemaVersion::V1 => 1,
            SchemaVersion::V2 => 2,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        SchemaVersion::V2
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for SchemaVersion {
    type Err = GpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(['v', 'V']) {
            "1" => Ok(SchemaVersion::V1),
            "2" => Ok(SchemaVersion::V2),
            other => Err(GpsError::Config(format!(
                "unsupported schema version '{}' (expected 1 or 2)",
                other
            ))),
        }
    }
}

/// How lane identifiers are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneIdFormat {
    /// Sanger sequencing lane format, e.g. `12345_6#78`.
    SangerLane,
    /// Free-form identifier: upper case, no spaces.
    Identifier,
}

/// How analysis rows are grouped when checking DUPLICATE/UNIQUE labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateGrouping {
    /// Group by the exact Public_name.
    ExactName,
    /// Group by Public_name with any `_R<digit>` repeat suffix removed.
    StripRepeatSuffix,
}

/// Accepted forms of the in-silico MLST allele columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InSilicoMlst {
    /// Integer allele, `NEW`, `PARTIAL_DELETION`, `ABSENT` or placeholder.
    Legacy,
    /// Raw mlst tool output (`~12`, `12?`, comma lists, `-`).
    MlstOutput,
}

static GENOTYPE_SUBSTITUTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^6E\((6[A-Z])\)$").unwrap());
static TRAILING_QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(.*\)$").unwrap());

/// Normalization applied to an in-silico serotype before vaccine coverage lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerotypeNormalization {
    /// `6E(6A)` becomes `6A`; any other trailing `(...)` qualifier is dropped.
    SubstituteGenotype,
    /// Only the trailing `(...)` qualifier is dropped, so `6E(6A)` becomes `6E`.
    StripQualifier,
}

impl SerotypeNormalization {
    /// Normalize a serotype string.
    pub fn apply(&self, serotype: &str) -> String {
        if *self == SerotypeNormalization::SubstituteGenotype {
            if let Some(caps) = GENOTYPE_SUBSTITUTION.captures(serotype) {
                return caps[1].to_string();
            }
        }
        TRAILING_QUALIFIER.replace(serotype, "").into_owned()
    }
}
