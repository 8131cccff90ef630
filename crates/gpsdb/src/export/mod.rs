//! Outputs consumed by the Monocle web application.

mod monocle;
mod stats;

pub use monocle::{
    analysis_monocle, metadata_monocle, Source, ANALYSIS_MONOCLE_COLUMNS, METADATA_MONOCLE_COLUMNS,
};
pub use stats::{
    dashboard_data, simplified_age, write_dashboard_data, CountryBreakdown, Counts, DashboardData,
    Summary,
};
