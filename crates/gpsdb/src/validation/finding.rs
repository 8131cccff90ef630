//! Validation findings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// An automatic repair was applied.
    Info,
    /// Unusual but plausible; never affects the exit status.
    Warning,
    /// Violates a hard invariant; the run fails once all checks have run.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Category of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Columns differ from the expected layout.
    SchemaMismatch,
    /// Lower-case values were folded to upper case.
    CaseNormalized,
    /// Leading/trailing whitespace was removed.
    WhitespaceStripped,
    /// A value contains an embedded space.
    EmbeddedSpace,
    /// A value lies outside a closed set.
    UnexpectedValue,
    /// A value lies outside a semi-open set of known values.
    UnknownValue,
    /// A numeric value is malformed or outside its range.
    OutOfRange,
    /// A value does not match its expected format.
    PatternMismatch,
    /// An identifier occurs more than once.
    DuplicateKey,
    /// DUPLICATE/UNIQUE labels are inconsistent within a group.
    DuplicateLabel,
    /// A value combination has no reference entry.
    UnknownCombination,
    /// A value has no entry in a reference table.
    MissingReference,
    /// Two tables disagree.
    CrossTableMismatch,
    /// Metadata was synthesized for a repeat sample.
    RepeatInserted,
    /// A repeat sample has neither metadata nor an original.
    RepeatUnresolved,
}

impl ReasonCode {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ReasonCode::SchemaMismatch => "Schema Mismatch",
            ReasonCode::CaseNormalized => "Case Normalized",
            ReasonCode::WhitespaceStripped => "Whitespace Stripped",
            ReasonCode::EmbeddedSpace => "Embedded Space",
            ReasonCode::UnexpectedValue => "Unexpected Value",
            ReasonCode::UnknownValue => "Unknown Value",
            ReasonCode::OutOfRange => "Out Of Range",
            ReasonCode::PatternMismatch => "Pattern Mismatch",
            ReasonCode::DuplicateKey => "Duplicate Key",
            ReasonCode::DuplicateLabel => "Duplicate Label",
            ReasonCode::UnknownCombination => "Unknown Combination",
            ReasonCode::MissingReference => "Missing Reference",
            ReasonCode::CrossTableMismatch => "Cross-Table Mismatch",
            ReasonCode::RepeatInserted => "Repeat Inserted",
            ReasonCode::RepeatUnresolved => "Repeat Unresolved",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One problem or repair found while validating a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub reason: ReasonCode,
    /// Table the finding belongs to.
    pub table: String,
    /// Affected column.
    pub column: String,
    /// The offending values, in the order they were found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    /// Create a new finding.
    pub fn new(
        severity: Severity,
        reason: ReasonCode,
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            reason,
            table: table.into(),
            column: column.into(),
            values: Vec::new(),
            message: message.into(),
        }
    }

    /// Attach the offending values.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this finding fails the run.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.reason, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_finding_builder() {
        let finding = Finding::new(
            Severity::Error,
            ReasonCode::EmbeddedSpace,
            "table1.csv",
            "Public_name",
            "Public_name in table1.csv has value(s) with space(s)",
        )
        .with_values(["GPS 1"]);

        assert!(finding.is_error());
        assert_eq!(finding.values, vec!["GPS 1"]);
        assert_eq!(
            finding.to_string(),
            "[Embedded Space] Public_name in table1.csv has value(s) with space(s)"
        );
    }

    #[test]
    fn test_serialize_reason() {
        let json = serde_json::to_string(&ReasonCode::CrossTableMismatch).unwrap();
        assert_eq!(json, "\"cross_table_mismatch\"");
    }
}
