//! CSV reading and writing for database tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{GpsError, Result};
use super::table::{Cell, Table};

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

/// Reads and writes tables.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file into a table named `name`.
    ///
    /// A missing file is reported as [`GpsError::MissingFile`] so callers can
    /// treat it as fatal separately from other IO failures.
    pub fn parse_file(&self, path: impl AsRef<Path>, name: impl Into<String>) -> Result<Table> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(GpsError::MissingFile(path.to_path_buf()));
        }

        let mut file = File::open(path).map_err(|e| GpsError::io(path, e))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| GpsError::io(path, e))?;

        let mut table = self.parse_bytes(&contents, name)?;
        table.path = path.to_path_buf();
        Ok(table)
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8], name: impl Into<String>) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        let expected_cols = headers.len();
        let name = name.into();
        let mut table = Table::new(name.clone(), name, headers);

        for result in reader.records() {
            let record = result?;
            let mut row: Vec<Cell> = record.iter().map(Cell::parse).collect();

            // Short rows are padded with empty values, long rows truncated
            row.resize(expected_cols, Cell::known(""));
            table.rows.push(row);
        }

        Ok(table)
    }

    /// Write a table to its own path, replacing the file.
    pub fn write(&self, table: &Table) -> Result<()> {
        self.write_to(table, &table.path)
    }

    /// Write a table to `path`, replacing the file.
    pub fn write_to(&self, table: &Table, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| GpsError::io(path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .from_writer(file);

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(Cell::as_raw))?;
        }
        writer.flush().map_err(|e| GpsError::io(path, e))?;
        Ok(())
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a comma-separated table using the table's path as its name.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    Parser::new().parse_file(path, path.display().to_string())
}

/// Write a comma-separated table to its own path.
pub fn write_table(table: &Table) -> Result<()> {
    Parser::new().write(table)
}
