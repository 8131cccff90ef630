//! Per-version rule tables.
//!
//! Everything that differs between schema versions lives here as data. The
//! table validators walk these tables; adding a version means adding a new
//! `VersionRules` value rather than new control flow.

use super::columns;
use super::types::{
    DuplicateGrouping, InSilicoMlst, LaneIdFormat, SchemaVersion, SerotypeNormalization,
};

/// The column layout and version-specific rule switches of one schema version.
#[derive(Debug, Clone)]
pub struct VersionRules {
    pub version: SchemaVersion,

    pub metadata_columns: &'static [&'static str],
    pub qc_columns: &'static [&'static str],
    pub analysis_columns: &'static [&'static str],

    /// Metadata carries a Continent column.
    pub has_continent: bool,
    pub antibiotic_columns: &'static [&'static str],
    pub metadata_case_only_columns: &'static [&'static str],

    pub qc_lane_id: LaneIdFormat,
    /// QC carries Public_name and Assembler columns.
    pub qc_has_identity: bool,
    /// Species percentage and depth of coverage may be the placeholder.
    pub qc_metrics_optional: bool,

    /// Column holding the Sanger sample identifier.
    pub sanger_sample_column: &'static str,
    pub sanger_sample_optional: bool,
    pub analysis_lane_id: LaneIdFormat,
    /// Analysis carries the legacy Paper_1 column.
    pub has_paper_column: bool,
    /// ERR/ERS accessions may be the placeholder.
    pub accessions_optional: bool,
    pub duplicate_grouping: DuplicateGrouping,
    pub in_silico_mlst: InSilicoMlst,
    pub colour_columns: &'static [&'static str],
    pub transparent_colour_columns: &'static [&'static str],
    pub wgs_columns: &'static [&'static str],
    pub wgs_sir_columns: &'static [&'static str],
    pub ariba_sir_columns: &'static [&'static str],
    /// Columns that must hold only the placeholder.
    pub retired_columns: &'static [&'static str],
    pub wgs_ery_cli_values: &'static [&'static str],

    /// Repeat backfill and QC/analysis cross-checks run for this version.
    pub cross_table_checks: bool,
    pub serotype_normalization: SerotypeNormalization,
}

static V1_RULES: VersionRules = VersionRules {
    version: SchemaVersion::V1,
    metadata_columns: columns::METADATA_V1,
    qc_columns: columns::QC_V1,
    analysis_columns: columns::ANALYSIS_V1,
    has_continent: true,
    antibiotic_columns: columns::ANTIBIOTICS_V1,
    metadata_case_only_columns: columns::METADATA_CASE_ONLY_V1,
    qc_lane_id: LaneIdFormat::SangerLane,
    qc_has_identity: false,
    qc_metrics_optional: false,
    sanger_sample_column: "Sample",
    sanger_sample_optional: false,
    analysis_lane_id: LaneIdFormat::SangerLane,
    has_paper_column: true,
    accessions_optional: false,
    duplicate_grouping: DuplicateGrouping::ExactName,
    in_silico_mlst: InSilicoMlst::Legacy,
    colour_columns: columns::COLOUR_V1,
    transparent_colour_columns: columns::COLOUR_TRANSPARENT_V1,
    wgs_columns: columns::WGS_V1,
    wgs_sir_columns: columns::WGS_SIR_V1,
    ariba_sir_columns: &[],
    retired_columns: &[],
    wgs_ery_cli_values: &["FLAG", "NEG", "POS"],
    cross_table_checks: false,
    serotype_normalization: SerotypeNormalization::SubstituteGenotype,
};

static V2_RULES: VersionRules = VersionRules {
    version: SchemaVersion::V2,
    metadata_columns: columns::METADATA_V2,
    qc_columns: columns::QC_V2,
    analysis_columns: columns::ANALYSIS_V2,
    has_continent: false,
    antibiotic_columns: columns::ANTIBIOTICS_V2,
    metadata_case_only_columns: columns::METADATA_CASE_ONLY_V2,
    qc_lane_id: LaneIdFormat::Identifier,
    qc_has_identity: true,
    qc_metrics_optional: true,
    sanger_sample_column: "Sanger_sample_id",
    sanger_sample_optional: true,
    analysis_lane_id: LaneIdFormat::Identifier,
    has_paper_column: false,
    accessions_optional: true,
    duplicate_grouping: DuplicateGrouping::StripRepeatSuffix,
    in_silico_mlst: InSilicoMlst::MlstOutput,
    colour_columns: columns::COLOUR_V2,
    transparent_colour_columns: columns::COLOUR_TRANSPARENT_V2,
    wgs_columns: columns::WGS_V2,
    wgs_sir_columns: columns::WGS_SIR_V2,
    ariba_sir_columns: columns::ARIBA_SIR_V2,
    retired_columns: columns::RETIRED_V2,
    wgs_ery_cli_values: &["R", "S"],
    cross_table_checks: true,
    serotype_normalization: SerotypeNormalization::SubstituteGenotype,
};

impl SchemaVersion {
    /// The rule table for this version.
    pub fn rules(&self) -> &'static VersionRules {
        match self {
            SchemaVersion::V1 => &V1_RULES,
            SchemaVersion::V2 => &V2_RULES,
        }
    }
}
