//! Table validators for the metadata, QC and analysis tables.

use crate::error::Result;
use crate::input::Table;
use crate::schema::{columns, InSilicoMlst, LaneIdFormat, VersionRules};

use super::context::ValidationContext;
use super::cross_table;
use super::patterns::{
    ANTIBIOTIC_AST, HEX_COLOUR, HEX_COLOUR_OR_TRANSPARENT, IN_SILICO_SEROTYPE, MLST_OUTPUT,
    PBP_TYPE_TRIPLE, PHENOTYPIC_SEROTYPE, RUN_ACCESSION, SAMPLE_ACCESSION, SANGER_LANE_ID,
    SANGER_SAMPLE_ID, WGS_MIC,
};
use super::rules::{
    apply_check, check_columns, check_whitespace, ColumnCheck, ColumnRule, Format, IntRange,
};

const CONTINENTS: &[&str] = &[
    "AFRICA", "ASIA", "CENTRAL AMERICA", "EUROPE", "LATIN AMERICA", "NORTH AMERICA", "OCEANIA", "_",
];
const MONTHS: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC", "_",
];
const YES_NO_EMPTY: &[&str] = &["Y", "N", "_"];
const GENDERS: &[&str] = &["M", "F", "_"];
const HIV_STATUSES: &[&str] = &["P", "N", "_"];
const ASSEMBLERS: &[&str] = &["SHOVILL", "UNICYCLER"];
const QC_OUTCOMES: &[&str] = &["PASS", "PASSPLUS", "FAIL", "_"];
const PAPER_FLAGS: &[&str] = &["YES", "NO"];
const DUPLICATE_FLAGS: &[&str] = &["DUPLICATE", "UNIQUE"];
const WGS_SIR_VALUES: &[&str] = &["NF", "R", "I", "S", "FLAG", "_"];
const ARIBA_SIR_VALUES: &[&str] = &["S", "I", "R", "INDETERMINABLE"];
const RETIRED_VALUES: &[&str] = &["_"];
const POS_NEG: &[&str] = &["POS", "NEG"];

/// Which table a validator applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Metadata,
    Qc,
    Analysis,
}

impl TableKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TableKind::Metadata => "metadata",
            TableKind::Qc => "QC",
            TableKind::Analysis => "analysis",
        }
    }
}

/// Validates one table against a schema version.
///
/// A validator is an ordered list of column checks behind a fatal schema
/// gate. Checks on a column run in list order, so case folding listed
/// before a value check sees the folded values.
pub trait TableValidator {
    /// The table this validator applies to.
    fn kind(&self) -> TableKind;

    /// The exact column set the table must have.
    fn expected_columns(&self) -> &'static [&'static str];

    /// Ordered column checks for this run.
    fn plan(&self, ctx: &ValidationContext<'_>) -> Vec<ColumnCheck>;

    /// Strip surrounding whitespace from every value before the column checks.
    fn strips_whitespace(&self) -> bool {
        false
    }

    /// Run the schema gate and then every column check.
    fn validate(&self, ctx: &mut ValidationContext<'_>, table: &mut Table) -> Result<()> {
        check_columns(ctx, table, self.expected_columns())?;
        if self.strips_whitespace() {
            check_whitespace(ctx, table);
        }
        for check in self.plan(ctx) {
            apply_check(ctx, table, &check);
        }
        Ok(())
    }
}

fn case_only(columns: &'static [&'static str]) -> impl Iterator<Item = ColumnCheck> {
    columns
        .iter()
        .map(|&column| ColumnCheck::new(column, vec![ColumnRule::Case]))
}

fn lane_id_rules(format: LaneIdFormat) -> Vec<ColumnRule> {
    match format {
        LaneIdFormat::SangerLane => vec![ColumnRule::pattern(&SANGER_LANE_ID), ColumnRule::Unique],
        LaneIdFormat::Identifier => vec![ColumnRule::Case, ColumnRule::NoSpace, ColumnRule::Unique],
    }
}

/// Validator for the metadata table (table1).
pub struct MetadataValidator {
    rules: &'static VersionRules,
}

impl MetadataValidator {
    pub fn new(rules: &'static VersionRules) -> Self {
        Self { rules }
    }
}

impl TableValidator for MetadataValidator {
    fn kind(&self) -> TableKind {
        TableKind::Metadata
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        self.rules.metadata_columns
    }

    fn strips_whitespace(&self) -> bool {
        true
    }

    fn plan(&self, ctx: &ValidationContext<'_>) -> Vec<ColumnCheck> {
        use ColumnRule::{AgeYears, Case, Country, Manifestation, NoSpace, Unique};

        let current_year = u64::try_from(ctx.current_year()).unwrap_or(0);
        let mut plan = Vec::new();

        if self.rules.has_continent {
            plan.push(ColumnCheck::new("Continent", vec![Case, ColumnRule::expected(CONTINENTS)]));
        }
        plan.extend([
            ColumnCheck::new("Sample_name", vec![Case, NoSpace]),
            ColumnCheck::new("Public_name", vec![Case, NoSpace, Unique]),
            ColumnCheck::new("Selection_random", vec![Case, ColumnRule::expected(YES_NO_EMPTY)]),
            ColumnCheck::new("Country", vec![Case, Country]),
            ColumnCheck::new("Month", vec![Case, ColumnRule::expected(MONTHS)]),
            ColumnCheck::new(
                "Year",
                vec![ColumnRule::IntRange(IntRange::new(1900, Some(current_year)).allow_empty())],
            ),
            ColumnCheck::new("Gender", vec![Case, ColumnRule::expected(GENDERS)]),
            ColumnCheck::new("Age_years", vec![AgeYears]),
            ColumnCheck::new("Age_months", vec![ColumnRule::float_range(0.0, 12.0, true)]),
            ColumnCheck::new("Age_days", vec![ColumnRule::IntRange(IntRange::new(0, Some(31)).allow_empty())]),
            ColumnCheck::new("HIV_status", vec![Case, ColumnRule::expected(HIV_STATUSES)]),
            ColumnCheck::new("Clinical_manifestation", vec![Case]),
            ColumnCheck::new(
                "Source",
                vec![
                    Case,
                    Manifestation {
                        paired_with: "Clinical_manifestation",
                    },
                ],
            ),
            ColumnCheck::new(
                "Phenotypic_serotype",
                vec![
                    Case,
                    ColumnRule::Regex {
                        format: Format::Pattern(&PHENOTYPIC_SEROTYPE),
                        allow_empty: true,
                        absolute: false,
                    },
                ],
            ),
            ColumnCheck::new(
                "Sequence_Type",
                vec![
                    Case,
                    ColumnRule::IntRange(
                        IntRange::new(1, Some(50_000))
                            .with_others(&["UNKNOWN"])
                            .allow_empty(),
                    ),
                ],
            ),
        ]);

        plan.extend(columns::MLST_GENES.iter().map(|&gene| {
            ColumnCheck::new(
                gene,
                vec![
                    Case,
                    ColumnRule::IntRange(
                        IntRange::new(1, None)
                            .with_others(&["UNKNOWN"])
                            .allow_empty()
                            .advisory(),
                    ),
                ],
            )
        }));

        plan.extend(self.rules.antibiotic_columns.iter().map(|&antibiotic| {
            ColumnCheck::new(
                antibiotic,
                vec![
                    Case,
                    ColumnRule::Regex {
                        format: Format::Pattern(&ANTIBIOTIC_AST),
                        allow_empty: true,
                        absolute: false,
                    },
                ],
            )
        }));

        plan.extend(case_only(self.rules.metadata_case_only_columns));
        plan
    }
}

/// Validator for the QC table (table2).
pub struct QcValidator {
    rules: &'static VersionRules,
}

impl QcValidator {
    pub fn new(rules: &'static VersionRules) -> Self {
        Self { rules }
    }
}

impl TableValidator for QcValidator {
    fn kind(&self) -> TableKind {
        TableKind::Qc
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        self.rules.qc_columns
    }

    fn plan(&self, _ctx: &ValidationContext<'_>) -> Vec<ColumnCheck> {
        use ColumnRule::{Case, NoSpace};

        let optional = self.rules.qc_metrics_optional;
        let mut plan = vec![ColumnCheck::new("Lane_id", lane_id_rules(self.rules.qc_lane_id))];

        if self.rules.qc_has_identity {
            plan.push(ColumnCheck::new("Public_name", vec![Case, NoSpace]));
            plan.push(ColumnCheck::new("Assembler", vec![Case, ColumnRule::expected(ASSEMBLERS)]));
        }

        plan.extend([
            ColumnCheck::new(
                "Streptococcus_pneumoniae",
                vec![ColumnRule::float_range(0.0, 100.0, optional)],
            ),
            ColumnCheck::new("Total_length", vec![ColumnRule::IntRange(IntRange::new(1, None).allow_empty())]),
            ColumnCheck::new("No_of_contigs", vec![ColumnRule::IntRange(IntRange::new(1, None).allow_empty())]),
            ColumnCheck::new("Genome_covered", vec![ColumnRule::float_range(0.0, 100.0, true)]),
            ColumnCheck::new(
                "Depth_of_coverage",
                vec![ColumnRule::float_range(0.0, f64::INFINITY, optional)],
            ),
            ColumnCheck::new(
                "Proportion_of_Het_SNPs",
                vec![ColumnRule::float_range(0.0, 100.0, true)],
            ),
            ColumnCheck::new("QC", vec![Case, ColumnRule::expected(QC_OUTCOMES)]),
            ColumnCheck::new("Hetsites_50bp", vec![ColumnRule::IntRange(IntRange::new(0, None).allow_empty())]),
            ColumnCheck::new("Supplier_name", vec![Case]),
        ]);
        plan
    }
}

/// Validator for the analysis table (table3).
pub struct AnalysisValidator {
    rules: &'static VersionRules,
}

impl AnalysisValidator {
    pub fn new(rules: &'static VersionRules) -> Self {
        Self { rules }
    }
}

impl TableValidator for AnalysisValidator {
    fn kind(&self) -> TableKind {
        TableKind::Analysis
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        self.rules.analysis_columns
    }

    fn plan(&self, _ctx: &ValidationContext<'_>) -> Vec<ColumnCheck> {
        use ColumnRule::{Case, DuplicateLabels, NoSpace};

        let rules = self.rules;
        let accession = |pattern| ColumnRule::Regex {
            format: Format::Pattern(pattern),
            allow_empty: rules.accessions_optional,
            absolute: true,
        };

        let mut plan = vec![ColumnCheck::new(
            rules.sanger_sample_column,
            vec![
                Case,
                ColumnRule::Regex {
                    format: Format::Pattern(&SANGER_SAMPLE_ID),
                    allow_empty: rules.sanger_sample_optional,
                    absolute: true,
                },
            ],
        )];

        if rules.has_paper_column {
            plan.push(ColumnCheck::new("Paper_1", vec![Case, ColumnRule::expected(PAPER_FLAGS)]));
        }

        plan.extend([
            ColumnCheck::new("Lane_id", lane_id_rules(rules.analysis_lane_id)),
            ColumnCheck::new("Public_name", vec![Case, NoSpace]),
            ColumnCheck::new("ERR", vec![Case, accession(&RUN_ACCESSION)]),
            ColumnCheck::new("ERS", vec![Case, accession(&SAMPLE_ACCESSION)]),
            ColumnCheck::new("No_of_genome", vec![ColumnRule::IntRange(IntRange::new(1, Some(4)))]),
            ColumnCheck::new(
                "Duplicate",
                vec![
                    Case,
                    ColumnRule::expected(DUPLICATE_FLAGS),
                    DuplicateLabels {
                        grouping: rules.duplicate_grouping,
                    },
                ],
            ),
            ColumnCheck::new(
                "In_silico_ST",
                vec![
                    Case,
                    ColumnRule::IntRange(
                        IntRange::new(1, Some(20_000))
                            .with_others(&["NEW", "-"])
                            .allow_empty(),
                    ),
                ],
            ),
        ]);

        plan.extend(columns::MLST_GENES.iter().map(|&gene| {
            let checks = match rules.in_silico_mlst {
                InSilicoMlst::Legacy => vec![
                    Case,
                    ColumnRule::IntRange(
                        IntRange::new(1, None)
                            .with_others(&["NEW", "PARTIAL_DELETION", "ABSENT"])
                            .allow_empty(),
                    ),
                ],
                InSilicoMlst::MlstOutput => vec![ColumnRule::pattern(&MLST_OUTPUT)],
            };
            ColumnCheck::new(gene, checks)
        }));

        plan.push(ColumnCheck::new(
            "GPSC",
            vec![ColumnRule::IntRange(IntRange::new(1, Some(2000)).allow_empty())],
        ));

        let colour = |pattern| ColumnRule::Regex {
            format: Format::Pattern(pattern),
            allow_empty: true,
            absolute: true,
        };
        plan.extend(
            rules
                .colour_columns
                .iter()
                .map(|&column| ColumnCheck::new(column, vec![Case, colour(&HEX_COLOUR)])),
        );
        plan.extend(rules.transparent_colour_columns.iter().map(|&column| {
            ColumnCheck::new(column, vec![Case, colour(&HEX_COLOUR_OR_TRANSPARENT)])
        }));

        plan.push(ColumnCheck::new(
            "In_silico_serotype",
            vec![
                Case,
                ColumnRule::Regex {
                    format: Format::Pattern(&IN_SILICO_SEROTYPE),
                    allow_empty: false,
                    absolute: false,
                },
            ],
        ));

        plan.extend(columns::PBP_GENES.iter().map(|&gene| {
            ColumnCheck::new(
                gene,
                vec![
                    Case,
                    ColumnRule::IntRange(IntRange::new(0, Some(1000)).with_others(&["NEW", "NF", "ERROR"])),
                ],
            )
        }));

        plan.extend(rules.wgs_columns.iter().map(|&column| {
            ColumnCheck::new(
                column,
                vec![
                    Case,
                    ColumnRule::Regex {
                        format: Format::Pattern(&WGS_MIC),
                        allow_empty: true,
                        absolute: true,
                    },
                ],
            )
        }));
        plan.extend(rules.wgs_sir_columns.iter().map(|&column| {
            ColumnCheck::new(column, vec![Case, ColumnRule::expected(WGS_SIR_VALUES)])
        }));
        plan.extend(rules.ariba_sir_columns.iter().map(|&column| {
            ColumnCheck::new(column, vec![Case, ColumnRule::expected(ARIBA_SIR_VALUES)])
        }));
        plan.extend(
            rules
                .retired_columns
                .iter()
                .map(|&column| ColumnCheck::new(column, vec![ColumnRule::expected(RETIRED_VALUES)])),
        );

        plan.push(ColumnCheck::new(
            "WGS_ERY_CLI",
            vec![Case, ColumnRule::expected(rules.wgs_ery_cli_values)],
        ));
        plan.push(ColumnCheck::new(
            "PBP1A_2B_2X__autocolour",
            vec![
                Case,
                ColumnRule::Regex {
                    format: Format::Pattern(&PBP_TYPE_TRIPLE),
                    allow_empty: true,
                    absolute: true,
                },
            ],
        ));
        plan.extend(
            columns::POS_NEG_GENES
                .iter()
                .map(|&gene| ColumnCheck::new(gene, vec![Case, ColumnRule::expected(POS_NEG)])),
        );
        plan.extend(case_only(columns::ANALYSIS_CASE_ONLY));
        plan
    }
}

/// The three source tables of one run.
#[derive(Debug, Clone)]
pub struct TableSet {
    pub metadata: Table,
    pub qc: Table,
    pub analysis: Table,
}

impl TableSet {
    /// Tables with at least one recorded repair.
    pub fn modified(&self) -> impl Iterator<Item = &Table> {
        [&self.metadata, &self.qc, &self.analysis]
            .into_iter()
            .filter(|table| table.is_modified())
    }
}

/// Runs the table validators and the cross-table checks of one schema version.
pub struct ValidationEngine {
    rules: &'static VersionRules,
    metadata: MetadataValidator,
    qc: QcValidator,
    analysis: AnalysisValidator,
}

impl ValidationEngine {
    /// Create an engine for a schema version's rule table.
    pub fn new(rules: &'static VersionRules) -> Self {
        Self {
            rules,
            metadata: MetadataValidator::new(rules),
            qc: QcValidator::new(rules),
            analysis: AnalysisValidator::new(rules),
        }
    }

    /// The table validators in run order.
    pub fn validators(&self) -> [&dyn TableValidator; 3] {
        [&self.metadata, &self.qc, &self.analysis]
    }

    /// Validate all three tables, repairing in place.
    ///
    /// Returns early only on a schema mismatch; row-level errors are left
    /// in the context.
    pub fn validate(&self, ctx: &mut ValidationContext<'_>, tables: &mut TableSet) -> Result<()> {
        self.metadata.validate(ctx, &mut tables.metadata)?;
        self.qc.validate(ctx, &mut tables.qc)?;
        self.analysis.validate(ctx, &mut tables.analysis)?;

        if self.rules.cross_table_checks {
            cross_table::backfill_repeats(ctx, &mut tables.metadata, &tables.analysis);
            cross_table::check_public_name_consistency(ctx, &tables.qc, &tables.analysis);
            cross_table::check_qc_inclusion(ctx, &tables.qc, &tables.analysis);
        }
        Ok(())
    }
}
