//! # Terraclass Core
//!
//! Core types and I/O for the terraclass land-cover classification pipeline.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced single-band grid
//! - `ImageStack`: ordered, named bands over one shared grid
//! - `GeoTransform`: affine georeferencing (north-up)
//! - `AreaOfInterest`: the polygon bounding every spatial operation
//! - `TrainingSet`: labeled polygons for supervised training
//! - Native GeoTIFF read/write

pub mod aoi;
pub mod crs;
pub mod error;
pub mod io;
pub mod raster;
pub mod vector;

pub use aoi::AreaOfInterest;
pub use crs::Crs;
pub use error::{Error, Result};
pub use raster::{GeoTransform, ImageStack, Raster, RasterElement};
pub use vector::{TrainingPolygon, TrainingSet};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aoi::AreaOfInterest;
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, ImageStack, Raster, RasterElement};
    pub use crate::vector::{TrainingPolygon, TrainingSet};
}
