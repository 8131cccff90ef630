//! Versioned table layouts and rule tables.

pub mod columns;
mod rules;
mod types;

pub use rules::VersionRules;
pub use types::{
    DuplicateGrouping, InSilicoMlst, LaneIdFormat, SchemaVersion, SerotypeNormalization,
};
