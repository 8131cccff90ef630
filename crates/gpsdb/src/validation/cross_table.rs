//! Relationship checks between the metadata, QC and analysis tables.

use std::collections::HashSet;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::{Cell, Change, Table};

use super::context::ValidationContext;
use super::finding::{Finding, ReasonCode, Severity};
use super::rules::lane_public_names;

static REPEAT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)_R[1-9]$").unwrap());

/// The original Public_name of a repeat, or `None` if `name` is not a repeat.
pub fn repeat_original(name: &str) -> Option<&str> {
    REPEAT_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Synthesize metadata for UNIQUE repeats that have none.
///
/// The original's metadata row is copied, relabelled with the repeat's
/// Public_name and inserted after the original (and after any repeat of it
/// already inserted). Repeats whose original also lacks metadata are
/// reported as unresolved.
pub fn backfill_repeats(ctx: &mut ValidationContext<'_>, metadata: &mut Table, analysis: &Table) {
    let (Some(a_name), Some(a_dup), Some(m_name)) = (
        analysis.column_index("Public_name"),
        analysis.column_index("Duplicate"),
        metadata.column_index("Public_name"),
    ) else {
        return;
    };

    let known: HashSet<String> = metadata
        .column("Public_name")
        .into_iter()
        .map(|cell| cell.as_raw().to_string())
        .collect();

    let repeats: IndexSet<&str> = analysis
        .rows
        .iter()
        .filter(|row| row[a_dup].as_raw() == "UNIQUE")
        .map(|row| row[a_name].as_raw())
        .filter(|name| repeat_original(name).is_some() && !known.contains(*name))
        .collect();

    let mut inserted = Vec::new();
    let mut unresolved = Vec::new();

    for repeat in repeats {
        let Some(original) = repeat_original(repeat) else {
            continue;
        };
        let Some(mut at) = metadata
            .rows
            .iter()
            .position(|row| row[m_name].as_raw() == original)
        else {
            unresolved.push(repeat.to_string());
            continue;
        };

        let mut row = metadata.rows[at].clone();
        row[m_name] = Cell::known(repeat);

        while at + 1 < metadata.rows.len()
            && repeat_original(metadata.rows[at + 1][m_name].as_raw()) == Some(original)
        {
            at += 1;
        }
        metadata.insert_after(at, row);
        metadata.changes.record(Change::RowInserted {
            public_name: repeat.to_string(),
        });
        inserted.push(repeat.to_string());
    }

    if !inserted.is_empty() {
        ctx.record(
            Finding::new(
                Severity::Info,
                ReasonCode::RepeatInserted,
                &metadata.name,
                "Public_name",
                format!(
                    "{} is missing the following repeat(s) marked as UNIQUE in {}; metadata of their original is copied: {}",
                    metadata.name,
                    analysis.name,
                    inserted.join(", ")
                ),
            )
            .with_values(inserted),
        );
    }
    if !unresolved.is_empty() {
        ctx.record(
            Finding::new(
                Severity::Warning,
                ReasonCode::RepeatUnresolved,
                &metadata.name,
                "Public_name",
                format!(
                    "{} is missing the following repeat(s) marked as UNIQUE in {} and their original: {}",
                    metadata.name,
                    analysis.name,
                    unresolved.join(", ")
                ),
            )
            .with_values(unresolved),
        );
    }
}

/// Lanes present in both QC and analysis must carry the same Public_name.
pub fn check_public_name_consistency(ctx: &mut ValidationContext<'_>, qc: &Table, analysis: &Table) {
    let qc_names = lane_public_names(qc);
    let analysis_names = lane_public_names(analysis);

    let mut mismatched: Vec<String> = analysis_names
        .iter()
        .filter(|&(lane, name)| qc_names.get(lane).is_some_and(|qc_name| qc_name != name))
        .map(|(lane, _)| lane.to_string())
        .collect();
    if mismatched.is_empty() {
        return;
    }
    mismatched.sort();

    ctx.record(
        Finding::new(
            Severity::Error,
            ReasonCode::CrossTableMismatch,
            &analysis.name,
            "Public_name",
            format!(
                "The following Lane_id(s) have different Public_name in {} and {}: {}",
                qc.name,
                analysis.name,
                mismatched.join(", ")
            ),
        )
        .with_values(mismatched),
    );
}

/// Analysis lanes must be in QC; passed lanes must be analysed; failed
/// lanes must not be.
pub fn check_qc_inclusion(ctx: &mut ValidationContext<'_>, qc: &Table, analysis: &Table) {
    let (Some(q_lane), Some(q_outcome)) = (qc.column_index("Lane_id"), qc.column_index("QC")) else {
        return;
    };

    let mut in_qc: HashSet<&str> = HashSet::new();
    let mut passed: HashSet<&str> = HashSet::new();
    let mut failed: HashSet<&str> = HashSet::new();
    for row in &qc.rows {
        let lane = row[q_lane].as_raw();
        in_qc.insert(lane);
        match row[q_outcome].as_raw() {
            "PASS" => {
                passed.insert(lane);
            }
            "FAIL" => {
                failed.insert(lane);
            }
            _ => {}
        }
    }
    let analysed: HashSet<&str> = analysis
        .column("Lane_id")
        .into_iter()
        .map(Cell::as_raw)
        .collect();

    let sorted = |lanes: Vec<&str>| {
        let mut lanes: Vec<String> = lanes.into_iter().map(str::to_string).collect();
        lanes.sort_unstable();
        lanes
    };

    let not_in_qc = sorted(analysed.difference(&in_qc).copied().collect());
    let passed_not_analysed = sorted(passed.difference(&analysed).copied().collect());
    let failed_analysed = sorted(failed.intersection(&analysed).copied().collect());

    let analysis_name = analysis.name.as_str();
    report_lanes(
        ctx,
        analysis_name,
        not_in_qc,
        format!("The following Lane_id(s) in {} are not found in {}", analysis.name, qc.name),
    );
    report_lanes(
        ctx,
        analysis_name,
        passed_not_analysed,
        format!(
            "The following Lane_id(s) passed QC in {} but are not found in {}",
            qc.name, analysis.name
        ),
    );
    report_lanes(
        ctx,
        analysis_name,
        failed_analysed,
        format!(
            "The following Lane_id(s) failed QC in {} but are found in {}",
            qc.name, analysis.name
        ),
    );
}

fn report_lanes(ctx: &mut ValidationContext<'_>, table: &str, lanes: Vec<String>, message: String) {
    if lanes.is_empty() {
        return;
    }
    ctx.record(
        Finding::new(
            Severity::Error,
            ReasonCode::CrossTableMismatch,
            table,
            "Lane_id",
            format!("{}: {}", message, lanes.join(", ")),
        )
        .with_values(lanes),
    );
}
