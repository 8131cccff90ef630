//! Validation engine: column rules, table validators and cross-table checks.

mod context;
pub mod cross_table;
mod finding;
pub mod patterns;
pub mod rules;
mod validators;

pub use context::ValidationContext;
pub use finding::{Finding, ReasonCode, Severity};
pub use patterns::ValuePattern;
pub use rules::{ColumnCheck, ColumnRule, Format, IntRange};
pub use validators::{
    AnalysisValidator, MetadataValidator, QcValidator, TableKind, TableSet, TableValidator,
    ValidationEngine,
};
