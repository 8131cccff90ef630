//! Main Processor struct and public API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::derive::{LocationResolver, Table4Deriver};
use crate::error::{GpsError, Result};
use crate::export::{analysis_monocle, dashboard_data, metadata_monocle, write_dashboard_data};
use crate::geocode::{Geocoder, MapboxGeocoder};
use crate::input::{Parser, ParserConfig, Table};
use crate::reference::{ReferenceData, ReferencePaths};
use crate::schema::SchemaVersion;
use crate::validation::{Finding, Severity, TableSet, ValidationContext, ValidationEngine};

/// Configuration for a processing run.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Schema version of the input tables.
    pub version: SchemaVersion,
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Metadata table (table1).
    pub metadata: PathBuf,
    /// QC table (table2).
    pub qc: PathBuf,
    /// Analysis table (table3).
    pub analysis: PathBuf,
    /// Derived table4 output.
    pub table4: PathBuf,
    pub metadata_monocle: PathBuf,
    pub analysis_monocle: PathBuf,
    /// Dashboard statistics output.
    pub data_json: PathBuf,
    /// Directory holding the reference data files.
    pub data_dir: PathBuf,
    /// Validate only: no repaired table is written and nothing is derived.
    pub validate_only: bool,
    /// Geocode locations missing from the coordinates reference. When off,
    /// every location must already be known.
    pub geocode: bool,
    /// Mapbox API key; falls back to `MAPBOX_API_KEY`.
    pub mapbox_key: Option<String>,
    /// Upper bound for collection years (None = this year).
    pub current_year: Option<i32>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            version: SchemaVersion::default(),
            parser: ParserConfig::default(),
            metadata: PathBuf::from("table1.csv"),
            qc: PathBuf::from("table2.csv"),
            analysis: PathBuf::from("table3.csv"),
            table4: PathBuf::from("table4.csv"),
            metadata_monocle: PathBuf::from("table1_monocle.csv"),
            analysis_monocle: PathBuf::from("table3_monocle.csv"),
            data_json: PathBuf::from("data.json"),
            data_dir: PathBuf::from("data"),
            validate_only: false,
            geocode: false,
            mapbox_key: None,
            current_year: None,
        }
    }
}

/// Counts of findings by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl FindingCounts {
    fn tally(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Error => counts.error += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub findings: FindingCounts,
    /// Input tables rewritten with repairs.
    pub repaired: Vec<PathBuf>,
    pub table4_rows: usize,
    pub metadata_monocle_rows: usize,
    pub analysis_monocle_rows: usize,
    /// Locations geocoded and added to the coordinates reference.
    pub geocoded: usize,
    /// Files written by the derivation stage.
    pub outputs: Vec<PathBuf>,
}

/// Validates the database tables and generates the derived outputs.
pub struct Processor {
    config: ProcessorConfig,
    parser: Parser,
    engine: ValidationEngine,
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl Processor {
    /// Create a processor with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    /// Create a processor with custom configuration.
    pub fn with_config(config: ProcessorConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let engine = ValidationEngine::new(config.version.rules());

        Self {
            config,
            parser,
            engine,
            geocoder: None,
        }
    }

    /// Use `geocoder` for locations missing from the coordinates reference.
    ///
    /// Enables geocoding regardless of [`ProcessorConfig::geocode`].
    pub fn with_geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.geocoder = Some(Arc::new(geocoder));
        self.config.geocode = true;
        self
    }

    /// The run configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Validate the three input tables, then derive table4, the Monocle
    /// tables and the dashboard statistics.
    ///
    /// Repaired tables are written back before a validation failure is
    /// reported, so the next run starts from the repaired copy.
    pub fn run(&self) -> Result<RunSummary> {
        let mut reference = ReferenceData::load(&ReferencePaths::in_dir(&self.config.data_dir))?;
        let mut tables = self.load_tables()?;

        let findings = {
            let mut ctx = ValidationContext::new(&reference);
            if let Some(year) = self.config.current_year {
                ctx = ctx.with_current_year(year);
            }
            self.engine.validate(&mut ctx, &mut tables)?;
            ctx.into_findings()
        };

        let mut summary = RunSummary {
            findings: FindingCounts::tally(&findings),
            ..Default::default()
        };

        if self.config.validate_only {
            let pending: Vec<&str> = tables.modified().map(|t| t.name.as_str()).collect();
            if !pending.is_empty() {
                warn!(tables = ?pending, "Validate-only run; repairs are not written");
            }
        } else {
            for table in tables.modified() {
                self.parser.write(table)?;
                info!(table = %table.name, repairs = table.changes.len(), "Wrote repaired table");
                summary.repaired.push(table.path.clone());
            }
        }

        if summary.findings.error > 0 {
            return Err(GpsError::ValidationFailed {
                errors: summary.findings.error,
            });
        }
        info!(version = %self.config.version, "Validation passed");

        if self.config.validate_only {
            return Ok(summary);
        }

        self.derive_outputs(&mut reference, &tables, &mut summary)?;
        info!("Processing completed; database is validated and all files are generated");
        Ok(summary)
    }

    fn load_tables(&self) -> Result<TableSet> {
        let load = |path: &Path| self.parser.parse_file(path, path.display().to_string());
        Ok(TableSet {
            metadata: load(&self.config.metadata)?,
            qc: load(&self.config.qc)?,
            analysis: load(&self.config.analysis)?,
        })
    }

    fn resolver(&self) -> Result<Option<Arc<dyn Geocoder>>> {
        if let Some(geocoder) = &self.geocoder {
            return Ok(Some(Arc::clone(geocoder)));
        }
        if !self.config.geocode {
            return Ok(None);
        }
        let geocoder = match &self.config.mapbox_key {
            Some(key) => MapboxGeocoder::new(key.clone())?,
            None => MapboxGeocoder::from_env()?,
        };
        Ok(Some(Arc::new(geocoder)))
    }

    fn derive_outputs(
        &self,
        reference: &mut ReferenceData,
        tables: &TableSet,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let geocoder = self.resolver()?;
        let resolver = match geocoder.as_deref() {
            Some(geocoder) => LocationResolver::with_geocoder(geocoder),
            None => LocationResolver::strict(),
        };

        let normalization = self.config.version.rules().serotype_normalization;
        let mut deriver = Table4Deriver::new(reference, resolver, normalization);
        let table4 = deriver.derive(&tables.metadata, &tables.analysis, &self.config.table4)?;
        summary.geocoded = deriver.geocoded();
        drop(deriver);
        self.write_output(&table4, summary)?;
        summary.table4_rows = table4.row_count();

        let metadata_view = metadata_monocle(
            reference,
            &tables.metadata,
            &tables.analysis,
            &table4,
            &self.config.metadata_monocle,
        );
        self.write_output(&metadata_view, summary)?;
        summary.metadata_monocle_rows = metadata_view.row_count();

        let analysis_view = analysis_monocle(&tables.qc, &tables.analysis, &self.config.analysis_monocle);
        self.write_output(&analysis_view, summary)?;
        summary.analysis_monocle_rows = analysis_view.row_count();

        let data = dashboard_data(reference, &metadata_view);
        write_dashboard_data(&data, &self.config.data_json)?;
        summary.outputs.push(self.config.data_json.clone());
        Ok(())
    }

    fn write_output(&self, table: &Table, summary: &mut RunSummary) -> Result<()> {
        self.parser.write(table)?;
        info!(path = %table.path.display(), rows = table.row_count(), "Wrote output table");
        summary.outputs.push(table.path.clone());
        Ok(())
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProcessorConfig::default();
        assert_eq!(config.version, SchemaVersion::V2);
        assert_eq!(config.table4, PathBuf::from("table4.csv"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.validate_only);
        assert!(!config.geocode);
    }

    #[test]
    fn test_with_geocoder_enables_geocoding() {
        let processor = Processor::new().with_geocoder(crate::geocode::StaticGeocoder::new());
        assert!(processor.config().geocode);
    }

    #[test]
    fn test_missing_reference_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let processor = Processor::with_config(ProcessorConfig {
            data_dir: dir.path().join("missing"),
            ..Default::default()
        });
        assert!(matches!(processor.run(), Err(GpsError::MissingFile(_))));
    }

    #[test]
    fn test_finding_counts() {
        use crate::validation::ReasonCode;
        let findings = vec![
            Finding::new(Severity::Error, ReasonCode::UnexpectedValue, "t", "c", "bad"),
            Finding::new(Severity::Warning, ReasonCode::UnknownValue, "t", "c", "odd"),
            Finding::new(Severity::Error, ReasonCode::OutOfRange, "t", "c", "bad"),
        ];
        let counts = FindingCounts::tally(&findings);
        assert_eq!(counts, FindingCounts { error: 2, warning: 1, info: 0 });
    }
}
