//! Table4: one derived summary row per specimen.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::info;

use crate::error::Result;
use crate::input::{Cell, Table};
use crate::reference::ReferenceData;
use crate::schema::SerotypeNormalization;

use super::fields;
use super::location::LocationResolver;

/// Columns preceding the per-vaccine coverage flags.
pub const TABLE4_LEADING_COLUMNS: &[&str] = &[
    "Public_name",
    "Latitude",
    "Longitude",
    "Resolution",
    "Vaccine_period",
    "Introduction_year",
    "PCV_type",
    "Manifestation",
    "Less_than_5_years_old",
];

/// Final table4 column.
pub const PUBLISHED_COLUMN: &str = "Published";

static ABSENT: Cell = Cell::Absent;

/// Analysis rows chosen as the UNIQUE representative, by Public_name.
///
/// The first UNIQUE row of a name wins.
pub fn unique_analysis_rows(analysis: &Table) -> IndexMap<&str, usize> {
    let mut rows = IndexMap::new();
    let (Some(name), Some(flag)) = (
        analysis.column_index("Public_name"),
        analysis.column_index("Duplicate"),
    ) else {
        return rows;
    };
    for (idx, row) in analysis.rows.iter().enumerate() {
        if row[flag].as_raw() == "UNIQUE" {
            rows.entry(row[name].as_raw()).or_insert(idx);
        }
    }
    rows
}

/// Index of the first row of each distinct value of `column`.
pub(crate) fn first_rows<'t>(table: &'t Table, column: &str) -> IndexMap<&'t str, usize> {
    let mut rows = IndexMap::new();
    if let Some(col) = table.column_index(column) {
        for (idx, row) in table.rows.iter().enumerate() {
            rows.entry(row[col].as_raw()).or_insert(idx);
        }
    }
    rows
}

/// Builds table4 from the metadata and analysis tables.
pub struct Table4Deriver<'a, 'g> {
    reference: &'a mut ReferenceData,
    resolver: LocationResolver<'g>,
    normalization: SerotypeNormalization,
}

impl<'a, 'g> Table4Deriver<'a, 'g> {
    pub fn new(
        reference: &'a mut ReferenceData,
        resolver: LocationResolver<'g>,
        normalization: SerotypeNormalization,
    ) -> Self {
        Self {
            reference,
            resolver,
            normalization,
        }
    }

    /// Column layout of table4 for the loaded vaccine valencies.
    pub fn headers(&self) -> Vec<String> {
        TABLE4_LEADING_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.reference.vaccines().map(str::to_string))
            .chain(std::iter::once(PUBLISHED_COLUMN.to_string()))
            .collect()
    }

    /// Number of locations geocoded during derivation.
    pub fn geocoded(&self) -> usize {
        self.resolver.geocoded()
    }

    /// Derive table4, outer-joining metadata and UNIQUE analysis rows on
    /// Public_name. Rows follow metadata order, then analysis-only names.
    pub fn derive(&mut self, metadata: &Table, analysis: &Table, path: impl Into<PathBuf>) -> Result<Table> {
        let path = path.into();
        let mut table4 = Table::new(path.display().to_string(), path, self.headers());

        let metadata_rows = first_rows(metadata, "Public_name");
        let analysis_rows = unique_analysis_rows(analysis);

        let names: Vec<&str> = metadata_rows
            .keys()
            .chain(analysis_rows.keys().filter(|n| !metadata_rows.contains_key(*n)))
            .copied()
            .collect();

        for name in names {
            let meta_row = metadata_rows.get(name).copied();
            let meta = |column: &str| {
                meta_row
                    .and_then(|row| metadata.get(row, column))
                    .unwrap_or(&ABSENT)
            };
            let serotype = analysis_rows
                .get(name)
                .and_then(|row| analysis.get(*row, "In_silico_serotype"));

            let row = self.derive_row(
                name,
                [meta("Country"), meta("Region"), meta("City")],
                meta("Year"),
                [meta("Age_years"), meta("Age_months"), meta("Age_days")],
                [meta("Clinical_manifestation"), meta("Source")],
                serotype,
            )?;
            table4.rows.push(row);
        }

        info!(
            rows = table4.row_count(),
            geocoded = self.resolver.geocoded(),
            "Derived {}",
            table4.name
        );
        Ok(table4)
    }

    fn derive_row(
        &mut self,
        public_name: &str,
        [country, region, city]: [&Cell; 3],
        year: &Cell,
        [years, months, days]: [&Cell; 3],
        [clinical, source]: [&Cell; 2],
        serotype: Option<&Cell>,
    ) -> Result<Vec<Cell>> {
        let coordinate = self.resolver.resolve(self.reference, country, region, city)?;
        let reference: &ReferenceData = self.reference;
        let period = fields::vaccine_period(reference, country, region, year);

        let mut row: Vec<Cell> = [
            public_name.to_string(),
            coordinate.latitude,
            coordinate.longitude,
            fields::resolution(country, region, city).to_string(),
            period.period,
            period.introduction_year,
            period.vaccine,
            fields::manifestation(reference, clinical, source),
            fields::under_five(reference, years, months, days),
        ]
        .iter()
        .map(|v| Cell::parse(v))
        .collect();

        match serotype {
            Some(serotype) => row.extend(
                fields::coverage_flags(reference, serotype.as_raw(), self.normalization)
                    .into_iter()
                    .map(Cell::known),
            ),
            None => row.extend(reference.vaccines().map(|_| Cell::Absent)),
        }
        row.push(Cell::known(fields::published(reference, public_name)));
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::StaticGeocoder;
    use crate::reference::Coordinate;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new("t.csv", "t.csv", headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.rows.push(row.iter().map(|v| Cell::parse(v)).collect());
        }
        table
    }

    const META: &[&str] = &[
        "Public_name", "Country", "Region", "City", "Year", "Age_years", "Age_months", "Age_days",
        "Clinical_manifestation", "Source",
    ];
    const ANALYSIS: &[&str] = &["Public_name", "Duplicate", "In_silico_serotype"];

    fn reference() -> ReferenceData {
        ReferenceData::new()
            .with_coordinate("UK,_,_", Coordinate::new("51.5", "-0.1"))
            .with_introduction("UK", "PCV7", 2006)
            .with_introduction("UK", "PCV13", 2010)
            .with_valency("PCV7", ["4", "6B", "9V", "14", "18C", "19F", "23F"])
            .with_valency("PCV13", ["1", "3", "4", "5", "6A", "6B", "7F", "9V", "14", "18C", "19A", "19F", "23F"])
            .with_manifestation("MENINGITIS", "CSF", "MENINGITIS")
            .with_published("GPS_UK_1")
    }

    #[test]
    fn test_headers_follow_valency_order() {
        let mut reference = reference();
        let deriver = Table4Deriver::new(
            &mut reference,
            LocationResolver::strict(),
            SerotypeNormalization::SubstituteGenotype,
        );
        let headers = deriver.headers();
        assert_eq!(headers[9], "PCV7");
        assert_eq!(headers[10], "PCV13");
        assert_eq!(headers.last().map(String::as_str), Some("Published"));
    }

    #[test]
    fn test_derive_uk_specimen() {
        let mut reference = reference();
        let metadata = table(
            META,
            &[&["GPS_UK_1", "UK", "_", "_", "2015", "3", "_", "_", "MENINGITIS", "CSF"]],
        );
        let analysis = table(ANALYSIS, &[&["GPS_UK_1", "UNIQUE", "6E(6A)"]]);

        let table4 = Table4Deriver::new(
            &mut reference,
            LocationResolver::strict(),
            SerotypeNormalization::SubstituteGenotype,
        )
        .derive(&metadata, &analysis, "table4.csv")
        .unwrap();

        assert_eq!(table4.row_count(), 1);
        let value = |column: &str| table4.get(0, column).map(|c| c.as_raw().to_string());
        assert_eq!(value("Latitude").as_deref(), Some("51.5"));
        assert_eq!(value("Longitude").as_deref(), Some("-0.1"));
        assert_eq!(value("Resolution").as_deref(), Some("0"));
        assert_eq!(value("Vaccine_period").as_deref(), Some("POSTPCV13-5YR"));
        assert_eq!(value("Introduction_year").as_deref(), Some("2010"));
        assert_eq!(value("PCV_type").as_deref(), Some("PCV13"));
        assert_eq!(value("Manifestation").as_deref(), Some("MENINGITIS"));
        assert_eq!(value("Less_than_5_years_old").as_deref(), Some("Y"));
        assert_eq!(value("PCV7").as_deref(), Some("N"));
        assert_eq!(value("PCV13").as_deref(), Some("Y"));
        assert_eq!(value("Published").as_deref(), Some("Y"));
    }

    #[test]
    fn test_outer_join_order_and_placeholders() {
        let mut reference = reference();
        let metadata = table(
            META,
            &[&["GPS_UK_2", "_", "_", "_", "_", "_", "_", "_", "_", "_"]],
        );
        let analysis = table(
            ANALYSIS,
            &[
                &["GPS_UK_3", "DUPLICATE", "14"],
                &["GPS_UK_4", "UNIQUE", "14"],
            ],
        );

        let table4 = Table4Deriver::new(
            &mut reference,
            LocationResolver::strict(),
            SerotypeNormalization::SubstituteGenotype,
        )
        .derive(&metadata, &analysis, "table4.csv")
        .unwrap();

        let names: Vec<&str> = table4.column("Public_name").into_iter().map(Cell::as_raw).collect();
        assert_eq!(names, vec!["GPS_UK_2", "GPS_UK_4"]);

        assert_eq!(table4.get(0, "PCV7"), Some(&Cell::Absent));
        assert_eq!(table4.get(0, "Resolution"), Some(&Cell::Absent));
        assert_eq!(table4.get(0, "Published"), Some(&Cell::known("N")));
        assert_eq!(table4.get(1, "Latitude"), Some(&Cell::Absent));
        assert_eq!(table4.get(1, "PCV7"), Some(&Cell::known("Y")));
    }

    #[test]
    fn test_unknown_location_geocoded_once() {
        let geocoder = StaticGeocoder::new().with_location("FRANCE,PARIS", 48.85, 2.35);
        let mut reference = reference();
        let metadata = table(
            META,
            &[
                &["GPS_FR_1", "FRANCE", "_", "PARIS", "_", "_", "_", "_", "_", "_"],
                &["GPS_FR_2", "FRANCE", "_", "PARIS", "_", "_", "_", "_", "_", "_"],
            ],
        );
        let analysis = table(ANALYSIS, &[]);

        let mut deriver = Table4Deriver::new(
            &mut reference,
            LocationResolver::with_geocoder(&geocoder),
            SerotypeNormalization::SubstituteGenotype,
        );
        let table4 = deriver.derive(&metadata, &analysis, "table4.csv").unwrap();

        assert_eq!(deriver.geocoded(), 1);
        assert_eq!(table4.get(1, "Latitude"), Some(&Cell::known("48.85")));
        assert_eq!(table4.get(1, "Resolution"), Some(&Cell::known("2")));
    }

    #[test]
    fn test_unique_analysis_rows_first_wins() {
        let analysis = table(
            ANALYSIS,
            &[&["A", "UNIQUE", "1"], &["A", "UNIQUE", "2"], &["B", "DUPLICATE", "3"]],
        );
        let rows = unique_analysis_rows(&analysis);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.get("A"), Some(&0));
    }
}
