//! End-to-end tests of a processing run over on-disk tables and reference data.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use gpsdb::export::DashboardData;
use gpsdb::geocode::StaticGeocoder;
use gpsdb::input::{read_table, write_table};
use gpsdb::schema::columns;
use gpsdb::{Cell, GpsError, Processor, ProcessorConfig, SchemaVersion, Table};

/// Helper to write a table whose unspecified cells are the placeholder.
fn write_csv(path: &Path, headers: &[&str], rows: &[&[(&str, &str)]]) {
    let mut table = Table::new(
        path.display().to_string(),
        path,
        headers.iter().map(|h| h.to_string()).collect(),
    );
    for row in rows {
        table.push_record(row.iter().map(|(column, value)| (*column, Cell::parse(value))));
    }
    write_table(&table).expect("Failed to write table");
}

fn write_reference(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("coordinates.csv"),
        "Country_Region_City,Latitude,Longitude\n\"UNITED KINGDOM,_,_\",51.5,-0.1\n",
    )
    .unwrap();
    fs::write(
        dir.join("non_standard_ages.csv"),
        "Age,Less_than_5_years_old\n<1,Y\nADULT,N\n",
    )
    .unwrap();
    fs::write(
        dir.join("manifestations.csv"),
        "Clinical_manifestation,Source,Manifestation\nMENINGITIS,CSF,MENINGITIS\n_,_,_\n",
    )
    .unwrap();
    fs::write(dir.join("published_public_names.txt"), "GPS_UK_1\n").unwrap();
    fs::write(
        dir.join("pcv_introduction_year.csv"),
        "Country,PCV,Year\nUNITED KINGDOM,PCV7,2006\nUNITED KINGDOM,PCV13,2010\n",
    )
    .unwrap();
    fs::write(
        dir.join("pcv_valency.csv"),
        "PCV,Serotypes\nPCV7,\"4,6B,9V,14,18C,19F,23F\"\nPCV13,\"1,3,4,5,6A,6B,7F,9V,14,18C,19A,19F,23F\"\n",
    )
    .unwrap();
    fs::write(
        dir.join("alpha2_country.csv"),
        "Alpha2,Country,Continent\nGB,United Kingdom,Europe\nFR,France,Europe\n",
    )
    .unwrap();
}

/// A specimen present in all three tables.
struct Specimen<'a> {
    public_name: &'a str,
    lane: &'a str,
    country: &'a str,
    city: &'a str,
    year: &'a str,
    age: &'a str,
    manifestation: (&'a str, &'a str),
    serotype: &'a str,
    duplicate: &'a str,
}

impl Default for Specimen<'_> {
    fn default() -> Self {
        Self {
            public_name: "GPS_UK_1",
            lane: "LANE_1",
            country: "UNITED KINGDOM",
            city: "_",
            year: "2015",
            age: "3",
            manifestation: ("MENINGITIS", "CSF"),
            serotype: "14",
            duplicate: "UNIQUE",
        }
    }
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_reference(&dir.path().join("data"));
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write table1-3 for `specimens`; `metadata_extra` adds cells to every
    /// metadata row. Repeats (`_R<n>`) get no metadata row.
    fn write_tables(&self, specimens: &[Specimen<'_>], metadata_extra: &[(&str, &str)]) {
        let metadata: Vec<Vec<(&str, &str)>> = specimens
            .iter()
            .filter(|s| !s.public_name.contains("_R"))
            .map(|s| {
                let mut row = vec![
                    ("Public_name", s.public_name),
                    ("Country", s.country),
                    ("City", s.city),
                    ("Year", s.year),
                    ("Age_years", s.age),
                    ("Clinical_manifestation", s.manifestation.0),
                    ("Source", s.manifestation.1),
                ];
                row.extend_from_slice(metadata_extra);
                row
            })
            .collect();
        let metadata: Vec<&[(&str, &str)]> = metadata.iter().map(Vec::as_slice).collect();
        write_csv(&self.path("table1.csv"), columns::METADATA_V2, &metadata);

        let qc: Vec<Vec<(&str, &str)>> = specimens
            .iter()
            .map(|s| {
                vec![
                    ("Lane_id", s.lane),
                    ("Public_name", s.public_name),
                    ("Assembler", "SHOVILL"),
                    ("Streptococcus_pneumoniae", "98.2"),
                    ("Depth_of_coverage", "55.1"),
                    ("QC", "PASS"),
                ]
            })
            .collect();
        let qc: Vec<&[(&str, &str)]> = qc.iter().map(Vec::as_slice).collect();
        write_csv(&self.path("table2.csv"), columns::QC_V2, &qc);

        let analysis: Vec<Vec<(&str, &str)>> = specimens
            .iter()
            .map(|s| {
                let mut row = vec![
                    ("Lane_id", s.lane),
                    ("Public_name", s.public_name),
                    ("No_of_genome", "1"),
                    ("Duplicate", s.duplicate),
                    ("In_silico_serotype", s.serotype),
                    ("GPSC", "5"),
                    ("In_silico_ST", "124"),
                    ("WGS_ERY_CLI", "S"),
                ];
                row.extend(columns::MLST_GENES.iter().map(|&gene| (gene, "1")));
                row.extend(columns::PBP_GENES.iter().map(|&gene| (gene, "2")));
                row.extend(columns::ARIBA_SIR_V2.iter().map(|&column| (column, "S")));
                row.extend(columns::POS_NEG_GENES.iter().map(|&gene| (gene, "NEG")));
                row
            })
            .collect();
        let analysis: Vec<&[(&str, &str)]> = analysis.iter().map(Vec::as_slice).collect();
        write_csv(&self.path("table3.csv"), columns::ANALYSIS_V2, &analysis);
    }

    fn config(&self) -> ProcessorConfig {
        ProcessorConfig {
            version: SchemaVersion::V2,
            metadata: self.path("table1.csv"),
            qc: self.path("table2.csv"),
            analysis: self.path("table3.csv"),
            table4: self.path("table4.csv"),
            metadata_monocle: self.path("table1_monocle.csv"),
            analysis_monocle: self.path("table3_monocle.csv"),
            data_json: self.path("data.json"),
            data_dir: self.path("data"),
            current_year: Some(2024),
            ..Default::default()
        }
    }
}

fn two_specimens() -> Vec<Specimen<'static>> {
    vec![
        Specimen {
            serotype: "6E(6A)",
            ..Default::default()
        },
        Specimen {
            public_name: "GPS_UK_2",
            lane: "LANE_2",
            year: "2005",
            age: "70",
            manifestation: ("_", "_"),
            ..Default::default()
        },
    ]
}

fn value(table: &Table, row: usize, column: &str) -> String {
    table
        .get(row, column)
        .map(|c| c.as_raw().to_string())
        .unwrap_or_default()
}

// =============================================================================
// Full runs
// =============================================================================

#[test]
fn test_clean_database_generates_all_outputs() {
    let ws = Workspace::new();
    ws.write_tables(&two_specimens(), &[]);

    let summary = Processor::with_config(ws.config())
        .run()
        .expect("Processing failed");

    assert_eq!(summary.findings.error, 0);
    assert!(summary.repaired.is_empty());
    assert_eq!(summary.table4_rows, 2);
    assert_eq!(summary.metadata_monocle_rows, 2);
    assert_eq!(summary.analysis_monocle_rows, 2);
    assert_eq!(summary.outputs.len(), 4);

    let table4 = read_table(ws.path("table4.csv")).unwrap();
    assert_eq!(value(&table4, 0, "Vaccine_period"), "POSTPCV13-5YR");
    assert_eq!(value(&table4, 0, "Latitude"), "51.5");
    assert_eq!(value(&table4, 0, "PCV13"), "Y");
    assert_eq!(value(&table4, 0, "Published"), "Y");
    assert_eq!(value(&table4, 1, "Vaccine_period"), "PREPCV");
    assert_eq!(value(&table4, 1, "Introduction_year"), "2006");
    assert_eq!(value(&table4, 1, "Less_than_5_years_old"), "N");
    assert_eq!(value(&table4, 1, "Manifestation"), "_");

    let monocle = read_table(ws.path("table1_monocle.csv")).unwrap();
    assert_eq!(value(&monocle, 0, "Country"), "United Kingdom");

    let json = fs::read_to_string(ws.path("data.json")).unwrap();
    let data: DashboardData = serde_json::from_str(&json).unwrap();
    assert_eq!(data.summary.country["United Kingdom"], 2);
    assert_eq!(
        data.summary.vaccine_period.keys().collect::<Vec<_>>(),
        vec!["POSTPCV13", "PREPCV"]
    );
    assert_eq!(data.country["GB"].age["70"], 1);
}

#[test]
fn test_repairs_are_persisted_before_failure() {
    let ws = Workspace::new();
    let mut specimens = two_specimens();
    specimens[1].year = "1850";
    ws.write_tables(&specimens, &[("Gender", "f")]);

    let err = Processor::with_config(ws.config()).run().unwrap_err();

    assert!(matches!(err, GpsError::ValidationFailed { errors: 1 }));
    let metadata = read_table(ws.path("table1.csv")).unwrap();
    assert_eq!(metadata.get(0, "Gender"), Some(&Cell::known("F")));
    assert!(!ws.path("table4.csv").exists());
}

#[test]
fn test_repaired_tables_need_no_further_repairs() {
    let ws = Workspace::new();
    let mut specimens = two_specimens();
    specimens[0].duplicate = "DUPLICATE";
    specimens.push(Specimen {
        public_name: "GPS_UK_1_R1",
        lane: "LANE_3",
        ..Default::default()
    });
    ws.write_tables(&specimens, &[("Gender", "f"), ("Sample_name", " S1 ")]);

    let first = Processor::with_config(ws.config())
        .run()
        .expect("Processing failed");
    assert!(first.findings.info >= 3);
    assert_eq!(first.repaired, vec![ws.path("table1.csv")]);

    let second = Processor::with_config(ProcessorConfig {
        validate_only: true,
        ..ws.config()
    })
    .run()
    .expect("Validation failed");

    assert_eq!(second.findings.info, 0);
    assert_eq!(second.findings.error, 0);
    assert!(second.repaired.is_empty());
    let metadata = read_table(ws.path("table1.csv")).unwrap();
    assert_eq!(metadata.row_count(), 3);
    assert_eq!(value(&metadata, 0, "Sample_name"), "S1");
    assert_eq!(value(&metadata, 1, "Gender"), "F");
}

#[test]
fn test_validate_only_writes_nothing() {
    let ws = Workspace::new();
    ws.write_tables(&two_specimens(), &[("Gender", "m")]);
    let before = fs::read_to_string(ws.path("table1.csv")).unwrap();

    let summary = Processor::with_config(ProcessorConfig {
        validate_only: true,
        ..ws.config()
    })
    .run()
    .expect("Validation failed");

    assert!(summary.findings.info > 0);
    assert!(summary.repaired.is_empty());
    assert_eq!(fs::read_to_string(ws.path("table1.csv")).unwrap(), before);
    assert!(!ws.path("table4.csv").exists());
    assert!(!ws.path("data.json").exists());
}

#[test]
fn test_schema_mismatch_is_fatal() {
    let ws = Workspace::new();
    ws.write_tables(&two_specimens(), &[]);
    write_csv(&ws.path("table2.csv"), columns::QC_V1, &[]);

    let err = Processor::with_config(ws.config()).run().unwrap_err();

    match err {
        GpsError::SchemaMismatch { missing, .. } => {
            assert_eq!(missing, vec!["Assembler".to_string(), "Public_name".to_string()]);
        }
        other => panic!("expected schema mismatch, got {other}"),
    }
}

#[test]
fn test_missing_table_is_fatal() {
    let ws = Workspace::new();
    ws.write_tables(&two_specimens(), &[]);
    fs::remove_file(ws.path("table3.csv")).unwrap();

    let err = Processor::with_config(ws.config()).run().unwrap_err();
    assert!(matches!(err, GpsError::MissingFile(path) if path.ends_with("table3.csv")));
}

// =============================================================================
// Cross-table behavior
// =============================================================================

#[test]
fn test_unique_repeat_gets_metadata_row() {
    let ws = Workspace::new();
    let mut specimens = two_specimens();
    specimens[0].duplicate = "DUPLICATE";
    specimens.push(Specimen {
        public_name: "GPS_UK_1_R1",
        lane: "LANE_3",
        ..Default::default()
    });
    ws.write_tables(&specimens, &[]);
    assert_eq!(read_table(ws.path("table1.csv")).unwrap().row_count(), 2);

    let summary = Processor::with_config(ws.config())
        .run()
        .expect("Processing failed");

    assert_eq!(summary.repaired, vec![ws.path("table1.csv")]);
    let metadata = read_table(ws.path("table1.csv")).unwrap();
    let names: Vec<&str> = metadata.column("Public_name").into_iter().map(Cell::as_raw).collect();
    assert_eq!(names, vec!["GPS_UK_1", "GPS_UK_1_R1", "GPS_UK_2"]);

    let monocle = read_table(ws.path("table1_monocle.csv")).unwrap();
    let names: Vec<&str> = monocle.column("Public_name").into_iter().map(Cell::as_raw).collect();
    assert_eq!(names, vec!["GPS_UK_1_R1", "GPS_UK_2"]);
    assert_eq!(value(&monocle, 0, "Published"), "Y");
}

// =============================================================================
// Locations
// =============================================================================

#[test]
fn test_unknown_location_without_geocoding_is_fatal() {
    let ws = Workspace::new();
    ws.write_tables(
        &[Specimen {
            public_name: "GPS_FR_1",
            country: "FRANCE",
            city: "PARIS",
            ..Default::default()
        }],
        &[],
    );

    let err = Processor::with_config(ws.config()).run().unwrap_err();
    assert!(matches!(err, GpsError::UnresolvedLocation(key) if key == "FRANCE,_,PARIS"));
}

#[test]
fn test_geocoded_location_is_added_to_reference() {
    let ws = Workspace::new();
    ws.write_tables(
        &[Specimen {
            public_name: "GPS_FR_1",
            country: "FRANCE",
            city: "PARIS",
            ..Default::default()
        }],
        &[],
    );

    let summary = Processor::with_config(ws.config())
        .with_geocoder(StaticGeocoder::new().with_location("FRANCE,PARIS", 48.85, 2.35))
        .run()
        .expect("Processing failed");

    assert_eq!(summary.geocoded, 1);
    let coordinates = fs::read_to_string(ws.path("data").join("coordinates.csv")).unwrap();
    assert!(coordinates.contains("\"FRANCE,_,PARIS\",48.85,2.35"));

    let table4 = read_table(ws.path("table4.csv")).unwrap();
    assert_eq!(value(&table4, 0, "Resolution"), "2");
    assert_eq!(value(&table4, 0, "Vaccine_period"), "PREPCV");
    assert_eq!(value(&table4, 0, "PCV_type"), "_");
}
