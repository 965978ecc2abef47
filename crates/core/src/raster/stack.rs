//! Multi-band image stack
//!
//! The composite image flowing through the pipeline: an ordered list of
//! named f64 bands sharing one grid. Band order is significant because it
//! defines the classifier's feature-vector layout.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster};

/// Ordered collection of named bands over one shared grid.
///
/// Invariant: every band has the same shape and geotransform as the first
/// band pushed; `push_band` enforces this.
#[derive(Debug, Clone, Default)]
pub struct ImageStack {
    bands: Vec<(String, Raster<f64>)>,
}

impl ImageStack {
    pub fn new() -> Self {
        Self { bands: Vec::new() }
    }

    /// Append a band. Fails if the name is already present or the band does
    /// not share the stack's grid.
    pub fn push_band(&mut self, name: impl Into<String>, band: Raster<f64>) -> Result<()> {
        let name = name.into();
        if self.bands.iter().any(|(n, _)| *n == name) {
            return Err(Error::DuplicateBand(name));
        }
        if let Some((_, first)) = self.bands.first() {
            if band.shape() != first.shape() || band.transform() != first.transform() {
                return Err(Error::BandMisaligned { name });
            }
        }
        self.bands.push((name, band));
        Ok(())
    }

    /// Look up a band by name.
    pub fn band(&self, name: &str) -> Result<&Raster<f64>> {
        self.bands
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b)
            .ok_or_else(|| Error::UnknownBand(name.to_string()))
    }

    /// Resolve a list of band names into raster references, in order.
    pub fn select<'a, S: AsRef<str>>(&'a self, names: &[S]) -> Result<Vec<&'a Raster<f64>>> {
        names.iter().map(|n| self.band(n.as_ref())).collect()
    }

    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn contains_band(&self, name: &str) -> bool {
        self.bands.iter().any(|(n, _)| n == name)
    }

    /// Number of bands
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Grid dimensions as (rows, cols). Zero for an empty stack.
    pub fn shape(&self) -> (usize, usize) {
        self.bands
            .first()
            .map(|(_, b)| b.shape())
            .unwrap_or((0, 0))
    }

    /// Shared geotransform, if any band is present.
    pub fn transform(&self) -> Option<&GeoTransform> {
        self.bands.first().map(|(_, b)| b.transform())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Raster<f64>)> {
        self.bands.iter().map(|(n, b)| (n.as_str(), b))
    }
}
