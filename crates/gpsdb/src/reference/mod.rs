//! Reference lookup tables: coordinates, ages, manifestations, published
//! names, vaccine timelines and valencies, and country codes.

mod data;
mod loader;
mod paths;

pub use data::{Coordinate, ReferenceData, VaccineIntroduction};
pub use paths::ReferencePaths;
