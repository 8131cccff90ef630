//! State threaded through every check of a validation run.

use chrono::Datelike;
use tracing::{error, info, warn};

use crate::reference::ReferenceData;

use super::finding::{Finding, Severity};

/// Carries the reference data and accumulates findings for one run.
pub struct ValidationContext<'a> {
    reference: &'a ReferenceData,
    current_year: i32,
    findings: Vec<Finding>,
    errors: usize,
}

impl<'a> ValidationContext<'a> {
    /// Create a context for a run starting now.
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self {
            reference,
            current_year: chrono::Local::now().year(),
            findings: Vec::new(),
            errors: 0,
        }
    }

    /// Override the year used as the upper bound for collection years.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// The reference data for this run.
    pub fn reference(&self) -> &'a ReferenceData {
        self.reference
    }

    /// Upper bound for collection years.
    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Record a finding and emit the matching log line.
    pub fn record(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Info => info!(
                table = %finding.table,
                column = %finding.column,
                reason = %finding.reason,
                "{}",
                finding.message
            ),
            Severity::Warning => warn!(
                table = %finding.table,
                column = %finding.column,
                reason = %finding.reason,
                "{}",
                finding.message
            ),
            Severity::Error => {
                self.errors += 1;
                error!(
                    table = %finding.table,
                    column = %finding.column,
                    reason = %finding.reason,
                    "{}",
                    finding.message
                )
            }
        }
        self.findings.push(finding);
    }

    /// All findings so far, in the order they were recorded.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of error-level findings.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Whether any error-level finding was recorded.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Consume the context, returning its findings.
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}
