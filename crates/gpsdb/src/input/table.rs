//! In-memory table model.

use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Literal token used on disk for an intentionally absent value.
pub const PLACEHOLDER: &str = "_";

/// A single field value.
///
/// The on-disk placeholder `_` is parsed into [`Cell::Absent`] and only turned
/// back into the literal token when the table is written out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    /// A value was supplied (it may still be invalid).
    Known(String),
    /// The value is intentionally absent.
    Absent,
}

impl Cell {
    /// Parse a raw field.
    pub fn parse(raw: &str) -> Self {
        if raw == PLACEHOLDER {
            Cell::Absent
        } else {
            Cell::Known(raw.to_string())
        }
    }

    /// Build a known cell.
    pub fn known(value: impl Into<String>) -> Self {
        Cell::Known(value.into())
    }

    /// Build a cell from an optional value.
    pub fn from_option(value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => Cell::Known(v.into()),
            None => Cell::Absent,
        }
    }

    /// The known value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Cell::Known(v) => Some(v.as_str()),
            Cell::Absent => None,
        }
    }

    /// Whether the cell is the placeholder.
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    /// The on-disk representation.
    pub fn as_raw(&self) -> &str {
        match self {
            Cell::Known(v) => v.as_str(),
            Cell::Absent => PLACEHOLDER,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_raw())
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_raw())
    }
}

/// An automatic repair applied to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A column was folded to upper case.
    CaseFolded { column: String },
    /// Leading/trailing whitespace was stripped from a column.
    WhitespaceStripped { column: String },
    /// A row was synthesized for a repeat sample.
    RowInserted { public_name: String },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::CaseFolded { column } => write!(f, "upper-cased {}", column),
            Change::WhitespaceStripped { column } => write!(f, "stripped whitespace in {}", column),
            Change::RowInserted { public_name } => write!(f, "inserted row for {}", public_name),
        }
    }
}

/// Repairs applied to one table during a run.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    entries: Vec<Change>,
}

impl ChangeLog {
    /// Record a repair.
    pub fn record(&mut self, change: Change) {
        self.entries.push(change);
    }

    /// Whether no repair has been applied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of repairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over the recorded repairs.
    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.entries.iter()
    }
}

/// Represents parsed tabular data.
#[derive(Debug, Clone)]
pub struct Table {
    /// Short name used in findings and log lines (usually the file path).
    pub name: String,
    /// Where the table was loaded from or will be written to.
    pub path: PathBuf,
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Cell>>,
    /// Repairs applied since loading.
    pub changes: ChangeLog,
}

impl Table {
    /// Create an empty table with the given headers.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            headers,
            rows: Vec::new(),
            changes: ChangeLog::default(),
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Whether the table has a column.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All values of a column, in row order. Empty when the column is missing.
    pub fn column(&self, name: &str) -> Vec<&Cell> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|row| &row[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Distinct values of a column, in order of first appearance.
    pub fn unique_values(&self, name: &str) -> Vec<&Cell> {
        let mut seen = std::collections::HashSet::new();
        self.column(name)
            .into_iter()
            .filter(|cell| seen.insert(*cell))
            .collect()
    }

    /// Distinct known values of a column, in order of first appearance.
    pub fn unique_known(&self, name: &str) -> Vec<&str> {
        self.unique_values(name)
            .into_iter()
            .filter_map(Cell::value)
            .collect()
    }

    /// Get a specific cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Apply `f` to every cell of a column. Returns true when any cell changed.
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(&Cell) -> Cell) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        let mut changed = false;
        for row in &mut self.rows {
            let updated = f(&row[idx]);
            if updated != row[idx] {
                row[idx] = updated;
                changed = true;
            }
        }
        changed
    }

    /// Append a row given as `(column, value)` pairs; unspecified columns are absent.
    pub fn push_record<'a>(&mut self, record: impl IntoIterator<Item = (&'a str, Cell)>) {
        let mut row = vec![Cell::Absent; self.headers.len()];
        for (column, value) in record {
            if let Some(idx) = self.column_index(column) {
                row[idx] = value;
            }
        }
        self.rows.push(row);
    }

    /// Insert a row immediately after `index`.
    pub fn insert_after(&mut self, index: usize, row: Vec<Cell>) {
        let at = (index + 1).min(self.rows.len());
        self.rows.insert(at, row);
    }

    /// Whether any repair has been applied.
    pub fn is_modified(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(
            "t",
            "t.csv",
            vec!["Public_name".to_string(), "Country".to_string()],
        );
        table.rows.push(vec![Cell::known("A"), Cell::known("UK")]);
        table.rows.push(vec![Cell::known("B"), Cell::Absent]);
        table.rows.push(vec![Cell::known("C"), Cell::known("UK")]);
        table
    }

    #[test]
    fn test_placeholder_round_trip() {
        assert_eq!(Cell::parse("_"), Cell::Absent);
        assert_eq!(Cell::parse("x"), Cell::known("x"));
        assert_eq!(Cell::Absent.as_raw(), "_");
        assert_eq!(Cell::parse(""), Cell::known(""));
    }

    #[test]
    fn test_unique_values_preserve_order() {
        let table = sample();
        assert_eq!(
            table.unique_values("Country"),
            vec![&Cell::known("UK"), &Cell::Absent]
        );
        assert_eq!(table.unique_known("Country"), vec!["UK"]);
        assert!(table.column("Missing").is_empty());
    }

    #[test]
    fn test_map_column_reports_change() {
        let mut table = sample();
        assert!(!table.map_column("Country", |c| c.clone()));
        assert!(table.map_column("Country", |c| match c {
            Cell::Known(v) => Cell::known(v.to_lowercase()),
            Cell::Absent => Cell::Absent,
        }));
        assert_eq!(table.get(0, "Country"), Some(&Cell::known("uk")));
    }

    #[test]
    fn test_insert_after() {
        let mut table = sample();
        table.insert_after(0, vec![Cell::known("A_R1"), Cell::known("UK")]);
        assert_eq!(table.get(1, "Public_name"), Some(&Cell::known("A_R1")));
        assert_eq!(table.row_count(), 4);
    }
}
