//! Loading reference data from disk.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::error::{GpsError, Result};

use super::data::{Coordinate, ReferenceData};
use super::paths::ReferencePaths;

impl ReferenceData {
    /// Load all reference files.
    pub fn load(paths: &ReferencePaths) -> Result<Self> {
        let mut data = ReferenceData {
            coordinates_path: Some(paths.coordinates.clone()),
            ..Default::default()
        };

        data.reload_coordinates()?;

        for record in read_records(&paths.non_standard_ages, 2)? {
            data.non_standard_ages
                .insert(record[0].to_string(), record[1].to_string());
        }

        for record in read_records(&paths.manifestations, 3)? {
            data.manifestations.insert(
                (record[0].to_string(), record[1].to_string()),
                record[2].to_string(),
            );
        }

        let published = read_text(&paths.published_public_names)?;
        for line in published.lines() {
            data.insert_published(line);
        }

        for record in read_records(&paths.pcv_introduction_year, 3)? {
            let year = record[2].trim().parse::<i32>().map_err(|_| {
                GpsError::reference(
                    &paths.pcv_introduction_year,
                    format!("invalid introduction year '{}' for {}", &record[2], &record[0]),
                )
            })?;
            data = data.with_introduction(&record[0], &record[1], year);
        }

        for record in read_records(&paths.pcv_valency, 2)? {
            data.valency.insert(
                record[0].to_string(),
                record[1].split(',').map(|s| s.to_string()).collect(),
            );
        }

        for record in read_records(&paths.alpha2_country, 3)? {
            data.insert_country(&record[0], &record[1], record[2].to_string());
        }

        info!(
            coordinates = data.coordinates.len(),
            manifestations = data.manifestations.len(),
            countries = data.country_alpha2.len(),
            vaccines = data.valency.len(),
            "Loaded reference data"
        );

        Ok(data)
    }

    /// Record a newly geocoded location.
    ///
    /// The entry is appended to the coordinates file and the in-memory table is
    /// then reloaded from disk, so both copies always agree. Reference data
    /// built in memory only gains the entry in memory.
    pub fn append_coordinate(&mut self, key: &str, coordinate: Coordinate) -> Result<()> {
        let Some(path) = self.coordinates_path.clone() else {
            self.coordinates.insert(key.to_string(), coordinate);
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| GpsError::io(&path, e))?;

        if !ends_with_newline(&mut file).map_err(|e| GpsError::io(&path, e))? {
            file.write_all(b"\n").map_err(|e| GpsError::io(&path, e))?;
        }

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record([key, coordinate.latitude.as_str(), coordinate.longitude.as_str()])?;
        writer.flush().map_err(|e| GpsError::io(&path, e))?;
        drop(writer);

        debug!(key, latitude = %coordinate.latitude, longitude = %coordinate.longitude, "Appended coordinate");
        self.reload_coordinates()
    }

    fn reload_coordinates(&mut self) -> Result<()> {
        let Some(path) = self.coordinates_path.clone() else {
            return Ok(());
        };
        self.coordinates.clear();
        for record in read_records(&path, 3)? {
            self.coordinates.insert(
                record[0].to_string(),
                Coordinate::new(&record[1], &record[2]),
            );
        }
        Ok(())
    }
}

fn ends_with_newline(file: &mut fs::File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn read_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(GpsError::MissingFile(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| GpsError::io(path, e))
}

/// Read a headed CSV file whose rows must all have exactly `fields` fields.
fn read_records(path: &Path, fields: usize) -> Result<Vec<StringRecord>> {
    let contents = read_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| GpsError::reference(path, e.to_string()))?;
        if record.len() != fields {
            return Err(GpsError::reference(
                path,
                format!(
                    "row {} has {} field(s), expected {}",
                    idx + 2,
                    record.len(),
                    fields
                ),
            ));
        }
        records.push(record);
    }
    Ok(records)
}
