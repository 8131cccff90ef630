//! Table4 derivation: coordinates, resolution, vaccine period, age bracket,
//! vaccine coverage and publication status per specimen.

pub mod fields;
mod location;
mod table4;

pub use location::LocationResolver;
pub(crate) use table4::first_rows;
pub use table4::{unique_analysis_rows, Table4Deriver, PUBLISHED_COLUMN, TABLE4_LEADING_COLUMNS};
