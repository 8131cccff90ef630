//! CLI command implementations.

pub mod integrate;
pub mod process;

use std::path::Path;

/// Every table argument must name a `.csv` file.
pub(crate) fn require_csv<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Result<(), String> {
    let invalid: Vec<String> = paths
        .into_iter()
        .filter(|p| p.extension().map(|e| e != "csv").unwrap_or(true))
        .map(|p| p.display().to_string())
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(format!("Not a .csv file: {}", invalid.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_csv() {
        assert!(require_csv([Path::new("table1.csv"), Path::new("dir/table2.csv")]).is_ok());
        let err = require_csv([Path::new("table1.tsv"), Path::new("table2")]).unwrap_err();
        assert!(err.contains("table1.tsv"));
        assert!(err.contains("table2"));
    }
}
