//! GeoTIFF reading and writing
//!
//! Native implementation on the `tiff` crate. Samples are stored as 32-bit
//! floats; georeferencing travels in the ModelPixelScale and ModelTiepoint
//! tags.

mod native;

pub use native::{read_geotiff, write_geotiff};
