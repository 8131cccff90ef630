//! gpsdb: validation and derivation engine for the GPS genomic surveillance
//! database.
//!
//! The database consists of three hand-curated tables: metadata (table1),
//! sequencing QC (table2) and genomic analysis (table3). A run validates all
//! three against a versioned rule set, repairs what can be repaired safely,
//! and derives table4, the Monocle export tables and the dashboard
//! statistics.
//!
//! # Example
//!
//! ```no_run
//! use gpsdb::{Processor, ProcessorConfig};
//!
//! let processor = Processor::with_config(ProcessorConfig {
//!     validate_only: true,
//!     ..Default::default()
//! });
//! let summary = processor.run().unwrap();
//!
//! println!("Warnings: {}", summary.findings.warning);
//! ```

pub mod derive;
pub mod error;
pub mod export;
pub mod geocode;
pub mod input;
pub mod integrate;
pub mod reference;
pub mod schema;
pub mod validation;

mod processor;

pub use crate::processor::{FindingCounts, Processor, ProcessorConfig, RunSummary};
pub use error::{GpsError, Result};
pub use input::{Cell, Table};
pub use integrate::{integrate_pipeline_results, IntegrationSummary};
pub use reference::{ReferenceData, ReferencePaths};
pub use schema::{SchemaVersion, VersionRules};
pub use validation::{Finding, ReasonCode, Severity};
