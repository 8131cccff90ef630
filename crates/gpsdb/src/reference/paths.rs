//! Locations of the reference data files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Paths of the seven reference data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePaths {
    /// `location_key,latitude,longitude`; appended to when new locations are geocoded.
    pub coordinates: PathBuf,
    /// `age_descriptor,is_under_5`
    pub non_standard_ages: PathBuf,
    /// `clinical_manifestation,source,manifestation_label`
    pub manifestations: PathBuf,
    /// One Public_name per line.
    pub published_public_names: PathBuf,
    /// `country,vaccine,introduction_year`
    pub pcv_introduction_year: PathBuf,
    /// `vaccine,"serotype,serotype,..."`
    pub pcv_valency: PathBuf,
    /// `alpha2,country,continent`
    pub alpha2_country: PathBuf,
}

impl ReferencePaths {
    /// Derive all reference file paths from a data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            coordinates: dir.join("coordinates.csv"),
            non_standard_ages: dir.join("non_standard_ages.csv"),
            manifestations: dir.join("manifestations.csv"),
            published_public_names: dir.join("published_public_names.txt"),
            pcv_introduction_year: dir.join("pcv_introduction_year.csv"),
            pcv_valency: dir.join("pcv_valency.csv"),
            alpha2_country: dir.join("alpha2_country.csv"),
        }
    }
}

impl Default for ReferencePaths {
    fn default() -> Self {
        Self::in_dir("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir() {
        let paths = ReferencePaths::in_dir("/srv/gps");
        assert_eq!(paths.coordinates, PathBuf::from("/srv/gps/coordinates.csv"));
        assert_eq!(
            paths.published_public_names,
            PathBuf::from("/srv/gps/published_public_names.txt")
        );
    }
}
