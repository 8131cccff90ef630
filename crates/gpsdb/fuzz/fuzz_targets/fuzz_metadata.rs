//! Fuzz target for metadata validation.
//!
//! Arbitrary rows under the V2 metadata header must validate without
//! panicking, and a second pass must find nothing left to repair.

#![no_main]

use gpsdb::input::Parser;
use gpsdb::schema::{columns, SchemaVersion};
use gpsdb::validation::{MetadataValidator, TableValidator, ValidationContext};
use gpsdb::ReferenceData;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let mut bytes = columns::METADATA_V2.join(",").into_bytes();
    bytes.push(b'\n');
    bytes.extend_from_slice(data);

    let Ok(mut table) = Parser::new().parse_bytes(&bytes, "table1.csv") else {
        return;
    };
    if table.headers.len() != columns::METADATA_V2.len() {
        return;
    }

    let reference = ReferenceData::new().with_country("GB", "United Kingdom", "Europe");
    let validator = MetadataValidator::new(SchemaVersion::V2.rules());

    let mut ctx = ValidationContext::new(&reference).with_current_year(2024);
    let _ = validator.validate(&mut ctx, &mut table);
    let repairs = table.changes.len();

    let mut again = ValidationContext::new(&reference).with_current_year(2024);
    let _ = validator.validate(&mut again, &mut table);
    assert_eq!(table.changes.len(), repairs, "second pass repaired again");
});
