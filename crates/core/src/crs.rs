//! Coordinate reference system tag.
//!
//! The pipeline only needs the distinction that changes pixel-area math:
//! geographic coordinates (degrees, area varies with latitude) versus
//! projected coordinates (linear meters, constant cell area).

use serde::{Deserialize, Serialize};

/// Coordinate reference system family of a raster or run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crs {
    /// Longitude/latitude degrees (e.g. EPSG:4326).
    #[default]
    Geographic,
    /// Planar meters (e.g. a UTM zone).
    Projected,
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crs::Geographic => write!(f, "geographic"),
            Crs::Projected => write!(f, "projected"),
        }
    }
}
