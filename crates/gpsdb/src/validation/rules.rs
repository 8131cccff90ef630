//! Column rule library.
//!
//! Every check works on one column (or one table) and reports through the
//! [`ValidationContext`]. Checks never stop at the first bad value: each
//! reports every offending distinct value in one finding. Only the schema
//! gate is fatal.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GpsError, Result};
use crate::input::{Cell, Change, Table};
use crate::schema::DuplicateGrouping;

use super::context::ValidationContext;
use super::finding::{Finding, ReasonCode, Severity};
use super::patterns::{ValuePattern, PLAIN_DECIMAL};

/// Region listed as a country in older submissions; it has no alpha-2 code.
const COUNTRY_WITHOUT_CODE: &str = "WEST AFRICA";

static REPEAT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_R[1-9]$").unwrap());

/// Integer range accepted by [`check_int_range`].
#[derive(Debug, Clone, Copy)]
pub struct IntRange {
    pub lo: u64,
    /// Inclusive upper bound; `None` means unbounded.
    pub hi: Option<u64>,
    /// Escape values accepted in addition to the range.
    pub others: &'static [&'static str],
    /// The placeholder is skipped entirely.
    pub allow_empty: bool,
    /// Violations are errors rather than warnings.
    pub absolute: bool,
}

impl IntRange {
    /// Range `[lo, hi]`; errors on violation, placeholder not allowed.
    pub fn new(lo: u64, hi: Option<u64>) -> Self {
        Self {
            lo,
            hi,
            others: &[],
            allow_empty: false,
            absolute: true,
        }
    }

    /// Accept these escape values too.
    pub fn with_others(mut self, others: &'static [&'static str]) -> Self {
        self.others = others;
        self
    }

    /// Skip the placeholder.
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Report violations as warnings.
    pub fn advisory(mut self) -> Self {
        self.absolute = false;
        self
    }

    /// Whether a raw value satisfies the range or is an escape value.
    pub fn accepts(&self, value: &str) -> bool {
        if self.others.contains(&value) {
            return true;
        }
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match value.parse::<u64>() {
            Ok(n) => n >= self.lo && self.hi.is_none_or(|hi| n <= hi),
            // Too large for u64: only an unbounded range accepts it
            Err(_) => self.hi.is_none(),
        }
    }
}

/// Value format accepted by [`check_regex`].
#[derive(Debug, Clone, Copy)]
pub enum Format {
    /// A named pattern.
    Pattern(&'static ValuePattern),
    /// A plain decimal within an inclusive range.
    FloatRange(f64, f64),
}

impl Format {
    /// Whether a raw value has this format.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Format::Pattern(pattern) => pattern.matches(value),
            Format::FloatRange(lo, hi) => {
                PLAIN_DECIMAL.matches(value)
                    && value
                        .parse::<f64>()
                        .is_ok_and(|v| *lo <= v && v <= *hi)
            }
        }
    }
}

/// A single rule applied to a column.
#[derive(Debug, Clone, Copy)]
pub enum ColumnRule {
    /// Upper-case the column if any lower-case value is present.
    Case,
    /// No value may contain a space.
    NoSpace,
    /// No value may occur twice.
    Unique,
    /// Values must come from a fixed set.
    Expected {
        values: &'static [&'static str],
        absolute: bool,
    },
    IntRange(IntRange),
    Regex {
        format: Format,
        allow_empty: bool,
        absolute: bool,
    },
    /// Countries need a vaccine timeline and an alpha-2 code.
    Country,
    /// Ages in years: plain decimal in [0, 130] or a listed descriptor.
    AgeYears,
    /// This column paired with another must be a manifestation key.
    Manifestation { paired_with: &'static str },
    /// DUPLICATE/UNIQUE labels must be consistent per group of Public_name.
    DuplicateLabels { grouping: DuplicateGrouping },
}

impl ColumnRule {
    /// Closed-set membership with errors.
    pub fn expected(values: &'static [&'static str]) -> Self {
        ColumnRule::Expected {
            values,
            absolute: true,
        }
    }

    /// Pattern match with errors.
    pub fn pattern(pattern: &'static ValuePattern) -> Self {
        ColumnRule::Regex {
            format: Format::Pattern(pattern),
            allow_empty: false,
            absolute: true,
        }
    }

    /// Float range with errors.
    pub fn float_range(lo: f64, hi: f64, allow_empty: bool) -> Self {
        ColumnRule::Regex {
            format: Format::FloatRange(lo, hi),
            allow_empty,
            absolute: true,
        }
    }
}

/// The ordered rules of one column.
#[derive(Debug, Clone)]
pub struct ColumnCheck {
    pub column: &'static str,
    pub rules: Vec<ColumnRule>,
}

impl ColumnCheck {
    pub fn new(column: &'static str, rules: Vec<ColumnRule>) -> Self {
        Self { column, rules }
    }
}

/// Run every rule of a check in order.
pub fn apply_check(ctx: &mut ValidationContext<'_>, table: &mut Table, check: &ColumnCheck) {
    let column = check.column;
    for rule in &check.rules {
        match *rule {
            ColumnRule::Case => {
                check_case(ctx, table, column);
            }
            ColumnRule::NoSpace => check_space(ctx, table, column),
            ColumnRule::Unique => check_unique(ctx, table, column),
            ColumnRule::Expected { values, absolute } => {
                check_expected(ctx, table, column, values, absolute)
            }
            ColumnRule::IntRange(range) => check_int_range(ctx, table, column, range),
            ColumnRule::Regex {
                format,
                allow_empty,
                absolute,
            } => check_regex(ctx, table, column, format, allow_empty, absolute),
            ColumnRule::Country => check_country(ctx, table, column),
            ColumnRule::AgeYears => check_age_years(ctx, table, column),
            ColumnRule::Manifestation { paired_with } => {
                check_manifestation(ctx, table, paired_with, column)
            }
            ColumnRule::DuplicateLabels { grouping } => {
                check_duplicate_uniqueness(ctx, table, "Public_name", column, grouping)
            }
        }
    }
}

/// Schema gate: the table must have exactly the expected columns.
///
/// A mismatch is recorded and returned as [`GpsError::SchemaMismatch`]; the
/// caller must stop, since no later check is meaningful.
pub fn check_columns(
    ctx: &mut ValidationContext<'_>,
    table: &Table,
    expected: &[&str],
) -> Result<()> {
    let actual: HashSet<&str> = table.headers.iter().map(String::as_str).collect();
    let expected_set: HashSet<&str> = expected.iter().copied().collect();

    let mut missing: Vec<String> = expected
        .iter()
        .filter(|c| !actual.contains(**c))
        .map(|c| c.to_string())
        .collect();
    let mut unexpected: Vec<String> = table
        .headers
        .iter()
        .filter(|c| !expected_set.contains(c.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }
    missing.sort();
    unexpected.sort();

    let err = GpsError::SchemaMismatch {
        table: table.name.clone(),
        missing: missing.clone(),
        unexpected: unexpected.clone(),
    };
    ctx.record(
        Finding::new(
            Severity::Error,
            ReasonCode::SchemaMismatch,
            &table.name,
            missing.iter().chain(&unexpected).cloned().collect::<Vec<_>>().join(", "),
            err.to_string(),
        )
        .with_values(missing.into_iter().chain(unexpected)),
    );
    Err(err)
}

fn has_lowercase_letters(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_alphabetic()) && value.chars().any(char::is_lowercase)
}

/// Upper-case the whole column if any value with letters is not upper case.
///
/// Returns true when the column was changed.
pub fn check_case(ctx: &mut ValidationContext<'_>, table: &mut Table, column: &str) -> bool {
    let needs_folding = table
        .unique_known(column)
        .into_iter()
        .any(has_lowercase_letters);
    if !needs_folding {
        return false;
    }

    table.map_column(column, |cell| match cell {
        Cell::Known(v) => Cell::Known(v.to_uppercase()),
        Cell::Absent => Cell::Absent,
    });
    table.changes.record(Change::CaseFolded {
        column: column.to_string(),
    });

    ctx.record(Finding::new(
        Severity::Info,
        ReasonCode::CaseNormalized,
        &table.name,
        column,
        format!(
            "{} in {} contains lowercase value(s) while being a UPPERCASE-only column",
            column, table.name
        ),
    ));
    true
}

/// Strip leading/trailing whitespace from every value of every column.
pub fn check_whitespace(ctx: &mut ValidationContext<'_>, table: &mut Table) {
    let columns = table.headers.clone();
    let mut stripped = Vec::new();

    for column in &columns {
        let changed = table.map_column(column, |cell| match cell {
            Cell::Known(v) if v.trim() != v.as_str() => Cell::parse(v.trim()),
            other => other.clone(),
        });
        if changed {
            table.changes.record(Change::WhitespaceStripped {
                column: column.clone(),
            });
            stripped.push(column.clone());
        }
    }

    if stripped.is_empty() {
        return;
    }
    ctx.record(
        Finding::new(
            Severity::Info,
            ReasonCode::WhitespaceStripped,
            &table.name,
            stripped.join(", "),
            format!(
                "{} contains value(s) with leading/trailing whitespace(s) in: {}",
                table.name,
                stripped.join(", ")
            ),
        )
        .with_values(stripped.clone()),
    );
}

/// Values must not contain a space anywhere.
pub fn check_space(ctx: &mut ValidationContext<'_>, table: &Table, column: &str) {
    let unexpected: Vec<String> = table
        .unique_known(column)
        .into_iter()
        .filter(|v| v.contains(' '))
        .map(str::to_string)
        .collect();
    if unexpected.is_empty() {
        return;
    }
    ctx.record(
        Finding::new(
            Severity::Error,
            ReasonCode::EmbeddedSpace,
            &table.name,
            column,
            format!(
                "{} in {} has the following value(s) with space(s): {}",
                column,
                table.name,
                unexpected.join(", ")
            ),
        )
        .with_values(unexpected),
    );
}

/// Values must come from `expected` (compared on their on-disk form).
pub fn check_expected(
    ctx: &mut ValidationContext<'_>,
    table: &Table,
    column: &str,
    expected: &[&str],
    absolute: bool,
) {
    let extras: Vec<String> = table
        .unique_values(column)
        .into_iter()
        .map(Cell::as_raw)
        .filter(|v| !expected.contains(v))
        .map(str::to_string)
        .collect();
    if extras.is_empty() {
        return;
    }

    let finding = if absolute {
        Finding::new(
            Severity::Error,
            ReasonCode::UnexpectedValue,
            &table.name,
            column,
            format!(
                "{} in {} has the following unexpected value(s): {}",
                column,
                table.name,
                extras.join(", ")
            ),
        )
    } else {
        Finding::new(
            Severity::Warning,
            ReasonCode::UnknownValue,
            &table.name,
            column,
            format!(
                "{} in {} has the following previously unknown value(s): {}. Please check if they are correct",
                column,
                table.name,
                extras.join(", ")
            ),
        )
    };
    ctx.record(finding.with_values(extras));
}

/// Distinct raw values of a column, without the placeholder when `allow_empty`.
fn candidates(table: &Table, column: &str, allow_empty: bool) -> Vec<String> {
    table
        .unique_values(column)
        .into_iter()
        .filter(|cell| !(allow_empty && cell.is_absent()))
        .map(|cell| cell.as_raw().to_string())
        .collect()
}

fn report_violations(
    ctx: &mut ValidationContext<'_>,
    table: &Table,
    column: &str,
    reason: ReasonCode,
    absolute: bool,
    unexpected: Vec<String>,
) {
    if unexpected.is_empty() {
        return;
    }
    let finding = if absolute {
        Finding::new(
            Severity::Error,
            reason,
            &table.name,
            column,
            format!(
                "{} in {} has the following unexpected value(s): {}",
                column,
                table.name,
                unexpected.join(", ")
            ),
        )
    } else {
        Finding::new(
            Severity::Warning,
            reason,
            &table.name,
            column,
            format!(
                "{} in {} has the following non-standard value(s): {}. Please check if they are correct",
                column,
                table.name,
                unexpected.join(", ")
            ),
        )
    };
    ctx.record(finding.with_values(unexpected));
}

/// Values must be decimal integers within `range` or one of its escape values.
pub fn check_int_range(
    ctx: &mut ValidationContext<'_>,
    table: &Table,
    column: &str,
    range: IntRange,
) {
    let unexpected = candidates(table, column, range.allow_empty)
        .into_iter()
        .filter(|v| !range.accepts(v))
        .collect();
    report_violations(ctx, table, column, ReasonCode::OutOfRange, range.absolute, unexpected);
}

/// Values must fully match `format`.
pub fn check_regex(
    ctx: &mut ValidationContext<'_>,
    table: &Table,
    column: &str,
    format: Format,
    allow_empty: bool,
    absolute: bool,
) {
    let unexpected = candidates(table, column, allow_empty)
        .into_iter()
        .filter(|v| !format.accepts(v))
        .collect();
    let reason = match format {
        Format::Pattern(_) => ReasonCode::PatternMismatch,
        Format::FloatRange(..) => ReasonCode::OutOfRange,
    };
    report_violations(ctx, table, column, reason, absolute, unexpected);
}

/// No value may occur more than once.
pub fn check_unique(ctx: &mut ValidationContext<'_>, table: &Table, column: &str) {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for cell in table.column(column) {
        *counts.entry(cell.as_raw()).or_default() += 1;
    }
    let duplicated: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(v, _)| v.to_string())
        .collect();
    if duplicated.is_empty() {
        return;
    }
    ctx.record(
        Finding::new(
            Severity::Error,
            ReasonCode::DuplicateKey,
            &table.name,
            column,
            format!(
                "{} in {} contains duplicate entries of: {}",
                column,
                table.name,
                duplicated.join(", ")
            ),
        )
        .with_values(duplicated),
    );
}

/// Countries without a vaccine timeline are warnings; countries without an
/// alpha-2 code are errors.
pub fn check_country(ctx: &mut ValidationContext<'_>, table: &Table, column: &str) {
    let reference = ctx.reference();
    let countries = table.unique_known(column);

    let mut no_vaccine_info: Vec<String> = countries
        .iter()
        .filter(|c| !reference.has_timeline(c))
        .map(|c| c.to_string())
        .collect();
    no_vaccine_info.sort();

    let no_alpha2: Vec<String> = countries
        .iter()
        .filter(|c| **c != COUNTRY_WITHOUT_CODE && reference.alpha2(c).is_none())
        .map(|c| c.to_string())
        .collect();

    if !no_vaccine_info.is_empty() {
        ctx.record(
            Finding::new(
                Severity::Warning,
                ReasonCode::MissingReference,
                &table.name,
                column,
                format!(
                    "{} in {} has the following country(s) without vaccine information: {}. \
                     If their National Immunisation Programme includes PCV, please add them to the vaccine introduction reference",
                    column,
                    table.name,
                    no_vaccine_info.join(", ")
                ),
            )
            .with_values(no_vaccine_info),
        );
    }

    if !no_alpha2.is_empty() {
        ctx.record(
            Finding::new(
                Severity::Error,
                ReasonCode::MissingReference,
                &table.name,
                column,
                format!(
                    "{} in {} has the following country(s) without ISO 3166-1 alpha-2 code: {}. \
                     Please check spelling or add their alpha-2 code to the country reference",
                    column,
                    table.name,
                    no_alpha2.join(", ")
                ),
            )
            .with_values(no_alpha2),
        );
    }
}

/// Ages in years must be a listed descriptor or a plain decimal in [0, 130].
pub fn check_age_years(ctx: &mut ValidationContext<'_>, table: &Table, column: &str) {
    let reference = ctx.reference();
    let range = Format::FloatRange(0.0, 130.0);
    let unexpected: Vec<String> = table
        .unique_known(column)
        .into_iter()
        .filter(|v| !reference.is_non_standard_age(v) && !range.accepts(v))
        .map(str::to_string)
        .collect();
    if unexpected.is_empty() {
        return;
    }
    ctx.record(
        Finding::new(
            Severity::Error,
            ReasonCode::OutOfRange,
            &table.name,
            column,
            format!(
                "{} in {} has the following unexpected value(s): {}. If valid, please add them to the non-standard ages reference and state whether they are less than 5 years old",
                column,
                table.name,
                unexpected.join(", ")
            ),
        )
        .with_values(unexpected),
    );
}

/// Every (clinical manifestation, source) pair must be a manifestation key.
pub fn check_manifestation(
    ctx: &mut ValidationContext<'_>,
    table: &Table,
    manifestation_column: &str,
    source_column: &str,
) {
    let (Some(m_idx), Some(s_idx)) = (
        table.column_index(manifestation_column),
        table.column_index(source_column),
    ) else {
        return;
    };

    let reference = ctx.reference();
    let mut seen = HashSet::new();
    let mut unexpected = Vec::new();
    for row in &table.rows {
        let pair = (row[m_idx].as_raw(), row[s_idx].as_raw());
        if seen.insert(pair) && reference.manifestation(pair.0, pair.1).is_none() {
            unexpected.push(format!("({}, {})", pair.0, pair.1));
        }
    }
    if unexpected.is_empty() {
        return;
    }
    ctx.record(
        Finding::new(
            Severity::Error,
            ReasonCode::UnknownCombination,
            &table.name,
            format!("{}/{}", manifestation_column, source_column),
            format!(
                "{} has the following unexpected {} and {} combination(s): {}. Please add them to the manifestations reference and state the resulting Manifestation",
                table.name,
                manifestation_column,
                source_column,
                unexpected.join(", ")
            ),
        )
        .with_values(unexpected),
    );
}

/// Grouping key of a Public_name under `grouping`.
pub fn duplicate_group_key(public_name: &str, grouping: DuplicateGrouping) -> String {
    match grouping {
        DuplicateGrouping::ExactName => public_name.to_string(),
        DuplicateGrouping::StripRepeatSuffix => REPEAT_SUFFIX.replace(public_name, "").into_owned(),
    }
}

/// DUPLICATE/UNIQUE label invariant over groups of rows sharing a specimen.
///
/// A specimen without duplicates should not be DUPLICATE (warning); a
/// duplicated specimen needs a UNIQUE representative (warning if none) and
/// may not have more than one (error).
pub fn check_duplicate_uniqueness(
    ctx: &mut ValidationContext<'_>,
    table: &Table,
    key_column: &str,
    flag_column: &str,
    grouping: DuplicateGrouping,
) {
    let (Some(k_idx), Some(f_idx)) = (table.column_index(key_column), table.column_index(flag_column))
    else {
        return;
    };

    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        groups
            .entry(duplicate_group_key(row[k_idx].as_raw(), grouping))
            .or_default()
            .push(idx);
    }

    let flag = |idx: usize| table.rows[idx][f_idx].as_raw();
    let name = |idx: usize| table.rows[idx][k_idx].as_raw().to_string();

    let mut singles_as_duplicate = Vec::new();
    let mut without_unique = Vec::new();
    let mut many_unique = Vec::new();

    for (key, rows) in &groups {
        if rows.len() == 1 {
            if flag(rows[0]) == "DUPLICATE" {
                singles_as_duplicate.push(name(rows[0]));
            }
            continue;
        }
        match rows.iter().filter(|idx| flag(**idx) == "UNIQUE").count() {
            0 => without_unique.push(key.clone()),
            1 => {}
            _ => many_unique.push(key.clone()),
        }
    }

    let (unique_label, duplicate_label) = match grouping {
        DuplicateGrouping::ExactName => ("unique Public_name(s)", "duplicates"),
        DuplicateGrouping::StripRepeatSuffix => (
            "unique Public_name(s) (_R* suffix repeats considered)",
            "duplicates (including _R* suffix repeats)",
        ),
    };

    if !singles_as_duplicate.is_empty() {
        ctx.record(
            Finding::new(
                Severity::Warning,
                ReasonCode::DuplicateLabel,
                &table.name,
                flag_column,
                format!(
                    "{} has the following {} marked as DUPLICATE in {}: {}. Please check if they are correct",
                    table.name,
                    unique_label,
                    flag_column,
                    singles_as_duplicate.join(", ")
                ),
            )
            .with_values(singles_as_duplicate),
        );
    }
    if !without_unique.is_empty() {
        ctx.record(
            Finding::new(
                Severity::Warning,
                ReasonCode::DuplicateLabel,
                &table.name,
                flag_column,
                format!(
                    "{} has the following duplicated Public_name(s) with none of their {} marked as UNIQUE in {}: {}. Please check if they are correct",
                    table.name,
                    duplicate_label,
                    flag_column,
                    without_unique.join(", ")
                ),
            )
            .with_values(without_unique),
        );
    }
    if !many_unique.is_empty() {
        ctx.record(
            Finding::new(
                Severity::Error,
                ReasonCode::DuplicateLabel,
                &table.name,
                flag_column,
                format!(
                    "{} has the following duplicated Public_name(s) with more than one of their {} marked as UNIQUE in {}: {}",
                    table.name,
                    duplicate_label,
                    flag_column,
                    many_unique.join(", ")
                ),
            )
            .with_values(many_unique),
        );
    }
}

/// Lane ids of `table` mapped to their Public_name (first occurrence wins).
pub(crate) fn lane_public_names(table: &Table) -> HashMap<&str, &str> {
    let (Some(l_idx), Some(p_idx)) = (table.column_index("Lane_id"), table.column_index("Public_name"))
    else {
        return HashMap::new();
    };
    let mut map = HashMap::new();
    for row in &table.rows {
        map.entry(row[l_idx].as_raw()).or_insert(row[p_idx].as_raw());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceData;
    use crate::validation::patterns::SANGER_LANE_ID;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(
            "t.csv",
            "t.csv",
            headers.iter().map(|h| h.to_string()).collect(),
        );
        for row in rows {
            table.rows.push(row.iter().map(|v| Cell::parse(v)).collect());
        }
        table
    }

    fn single(column: &str, values: &[&str]) -> Table {
        let rows: Vec<Vec<&str>> = values.iter().map(|v| vec![*v]).collect();
        let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
        table(&[column], &rows)
    }

    #[test]
    fn test_check_columns_conforming_is_noop() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = table(&["A", "B"], &[]);

        assert!(check_columns(&mut ctx, &t, &["B", "A"]).is_ok());
        assert!(ctx.findings().is_empty());
    }

    #[test]
    fn test_check_columns_names_offending_columns() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = table(&["A", "C"], &[]);

        let err = check_columns(&mut ctx, &t, &["A", "B"]).unwrap_err();
        match err {
            GpsError::SchemaMismatch {
                missing,
                unexpected,
                ..
            } => {
                assert_eq!(missing, vec!["B"]);
                assert_eq!(unexpected, vec!["C"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(ctx.error_count(), 1);
    }

    #[test]
    fn test_check_case_folds_column_once() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let mut t = single("Country", &["uk", "FRANCE", "_", "123"]);

        assert!(check_case(&mut ctx, &mut t, "Country"));
        assert_eq!(t.unique_known("Country"), vec!["UK", "FRANCE", "123"]);
        assert_eq!(ctx.findings().len(), 1);
        assert_eq!(ctx.findings()[0].severity, Severity::Info);

        assert!(!check_case(&mut ctx, &mut t, "Country"));
        assert_eq!(ctx.findings().len(), 1);
        assert_eq!(t.changes.len(), 1);
    }

    #[test]
    fn test_check_case_ignores_values_without_letters() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let mut t = single("Year", &["2015", "_", "<1"]);
        assert!(!check_case(&mut ctx, &mut t, "Year"));
        assert!(ctx.findings().is_empty());
    }

    #[test]
    fn test_check_whitespace() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let mut t = table(&["A", "B"], &[&[" x ", "y"], &[" _", "z"]]);

        check_whitespace(&mut ctx, &mut t);

        assert_eq!(t.get(0, "A"), Some(&Cell::known("x")));
        assert_eq!(t.get(1, "A"), Some(&Cell::Absent));
        assert_eq!(ctx.findings().len(), 1);
        assert_eq!(ctx.findings()[0].values, vec!["A"]);
    }

    #[test]
    fn test_check_space() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = single("Public_name", &["GPS_1", "GPS 2"]);
        check_space(&mut ctx, &t, "Public_name");
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.findings()[0].values, vec!["GPS 2"]);
    }

    #[test]
    fn test_check_expected_severity() {
        let reference = ReferenceData::new();
        let t = single("Gender", &["M", "X", "_"]);

        let mut ctx = ValidationContext::new(&reference);
        check_expected(&mut ctx, &t, "Gender", &["M", "F", "_"], true);
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.findings()[0].values, vec!["X"]);

        let mut ctx = ValidationContext::new(&reference);
        check_expected(&mut ctx, &t, "Gender", &["M", "F", "_"], false);
        assert_eq!(ctx.error_count(), 0);
        assert_eq!(ctx.findings()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_check_int_range() {
        let reference = ReferenceData::new();
        let t = single("No_of_genome", &["0", "5", "abc", "1", "4", "_"]);

        let mut ctx = ValidationContext::new(&reference);
        check_int_range(&mut ctx, &t, "No_of_genome", IntRange::new(1, Some(4)));
        assert_eq!(ctx.findings()[0].values, vec!["0", "5", "abc", "_"]);

        let mut ctx = ValidationContext::new(&reference);
        check_int_range(
            &mut ctx,
            &t,
            "No_of_genome",
            IntRange::new(1, Some(4)).allow_empty(),
        );
        assert_eq!(ctx.findings()[0].values, vec!["0", "5", "abc"]);
    }

    #[test]
    fn test_int_range_others_and_unbounded() {
        let range = IntRange::new(1, None).with_others(&["UNKNOWN"]);
        assert!(range.accepts("UNKNOWN"));
        assert!(range.accepts("99999999999999999999999"));
        assert!(!range.accepts("0"));
        assert!(!range.accepts("-1"));
        assert!(!range.accepts("1.0"));
    }

    #[test]
    fn test_check_regex_float_range() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = single("Age_months", &["0", "12", "12.5", "05", "_"]);
        check_regex(&mut ctx, &t, "Age_months", Format::FloatRange(0.0, 12.0), true, true);
        assert_eq!(ctx.findings()[0].values, vec!["12.5", "05"]);
        assert_eq!(ctx.findings()[0].reason, ReasonCode::OutOfRange);
    }

    #[test]
    fn test_check_regex_pattern() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = single("Lane_id", &["12345_6#78", "bad"]);
        check_regex(&mut ctx, &t, "Lane_id", Format::Pattern(&SANGER_LANE_ID), false, true);
        assert_eq!(ctx.findings()[0].values, vec!["bad"]);
        assert_eq!(ctx.findings()[0].reason, ReasonCode::PatternMismatch);
    }

    #[test]
    fn test_check_unique() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = single("Lane_id", &["A", "B", "A", "C", "B"]);
        check_unique(&mut ctx, &t, "Lane_id");
        assert_eq!(ctx.findings()[0].values, vec!["A", "B"]);
    }

    #[test]
    fn test_check_country() {
        let reference = ReferenceData::new()
            .with_country("GB", "UK", "Europe")
            .with_introduction("UK", "PCV13", 2010);
        let mut ctx = ValidationContext::new(&reference);
        let t = single("Country", &["UK", "FRANCE", "WEST AFRICA", "_"]);

        check_country(&mut ctx, &t, "Country");

        let findings = ctx.findings();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].values, vec!["FRANCE", "WEST AFRICA"]);
        assert_eq!(findings[1].severity, Severity::Error);
        assert_eq!(findings[1].values, vec!["FRANCE"]);
    }

    #[test]
    fn test_check_age_years() {
        let reference = ReferenceData::new().with_non_standard_age("ADULT", "N");
        let mut ctx = ValidationContext::new(&reference);
        let t = single("Age_years", &["4.5", "ADULT", "131", "05", "_"]);
        check_age_years(&mut ctx, &t, "Age_years");
        assert_eq!(ctx.findings()[0].values, vec!["131", "05"]);
    }

    #[test]
    fn test_check_manifestation() {
        let reference = ReferenceData::new().with_manifestation("MENINGITIS", "CSF", "MENINGITIS");
        let mut ctx = ValidationContext::new(&reference);
        let t = table(
            &["Clinical_manifestation", "Source"],
            &[&["MENINGITIS", "CSF"], &["PNEUMONIA", "BLOOD"]],
        );
        check_manifestation(&mut ctx, &t, "Clinical_manifestation", "Source");
        assert_eq!(ctx.findings()[0].values, vec!["(PNEUMONIA, BLOOD)"]);
        assert_eq!(ctx.findings()[0].reason, ReasonCode::UnknownCombination);
    }

    #[test]
    fn test_duplicate_without_unique_is_warning() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = table(
            &["Public_name", "Duplicate"],
            &[&["GPS_1", "DUPLICATE"], &["GPS_1", "DUPLICATE"]],
        );
        check_duplicate_uniqueness(&mut ctx, &t, "Public_name", "Duplicate", DuplicateGrouping::ExactName);
        assert_eq!(ctx.findings().len(), 1);
        assert_eq!(ctx.findings()[0].severity, Severity::Warning);
        assert_eq!(ctx.findings()[0].values, vec!["GPS_1"]);
    }

    #[test]
    fn test_duplicate_with_two_unique_is_error() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = table(
            &["Public_name", "Duplicate"],
            &[&["GPS_1", "UNIQUE"], &["GPS_1_R1", "UNIQUE"], &["GPS_1_R2", "DUPLICATE"]],
        );
        check_duplicate_uniqueness(
            &mut ctx,
            &t,
            "Public_name",
            "Duplicate",
            DuplicateGrouping::StripRepeatSuffix,
        );
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.findings()[0].values, vec!["GPS_1"]);
    }

    #[test]
    fn test_single_marked_duplicate_is_warning() {
        let reference = ReferenceData::new();
        let mut ctx = ValidationContext::new(&reference);
        let t = table(&["Public_name", "Duplicate"], &[&["GPS_1", "DUPLICATE"]]);
        check_duplicate_uniqueness(&mut ctx, &t, "Public_name", "Duplicate", DuplicateGrouping::ExactName);
        assert_eq!(ctx.findings()[0].severity, Severity::Warning);
        assert_eq!(ctx.error_count(), 0);
    }

    #[test]
    fn test_repeat_grouping_only_in_strip_mode() {
        assert_eq!(duplicate_group_key("GPS_1_R2", DuplicateGrouping::StripRepeatSuffix), "GPS_1");
        assert_eq!(duplicate_group_key("GPS_1_R2", DuplicateGrouping::ExactName), "GPS_1_R2");
        assert_eq!(duplicate_group_key("GPS_1_R10", DuplicateGrouping::StripRepeatSuffix), "GPS_1_R10");
    }
}
