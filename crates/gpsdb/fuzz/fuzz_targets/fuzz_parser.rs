//! Fuzz target for the table parser.
//!
//! This fuzzer tests that the CSV parser:
//! 1. Never panics on malformed input
//! 2. Always yields rows as wide as the header
//! 3. Writes back whatever it parsed

#![no_main]

use gpsdb::input::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    let Ok(table) = parser.parse_bytes(data, "fuzz.csv") else {
        return;
    };
    assert!(table.rows.iter().all(|row| row.len() == table.headers.len()));

    if let Ok(temp_file) = tempfile::NamedTempFile::new() {
        let _ = parser.write_to(&table, temp_file.path());
    }
});
