//! Per-class area summaries
//!
//! Sums the geographic footprint of every class in a classified raster.
//! Geographic rasters use cosine-of-latitude corrected degree metrics, so
//! pixel area varies by row; projected rasters have constant pixel area.

use rayon::prelude::*;
use std::collections::BTreeMap;
use terraclass_core::{Crs, Error, Raster, Result};

// Metres per degree of longitude at the equator and per degree of latitude.
const METRES_PER_DEG_LON: f64 = 111_320.0;
const METRES_PER_DEG_LAT: f64 = 110_540.0;

/// Class id to area in square kilometres, valid pixels only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassAreaTable {
    areas: BTreeMap<u8, f64>,
}

impl ClassAreaTable {
    /// Area of one class, 0 when the class never occurs.
    pub fn km2(&self, class: u8) -> f64 {
        self.areas.get(&class).copied().unwrap_or(0.0)
    }

    /// Total mapped area across all classes.
    pub fn total_km2(&self) -> f64 {
        self.areas.values().sum()
    }

    /// Classes present, with their areas, ascending by class id.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.areas.iter().map(|(&c, &a)| (c, a))
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Sum per-class area over all valid pixels of a classified raster.
///
/// Counts valid pixels first and fails with `BudgetExceeded` before any
/// area is computed when the count is above `budget`.
pub fn class_areas(classified: &Raster<u8>, budget: u64) -> Result<ClassAreaTable> {
    let valid = classified.valid_count() as u64;
    if valid > budget {
        return Err(Error::BudgetExceeded {
            pixels: valid,
            budget,
        });
    }

    let (rows, cols) = classified.shape();
    let transform = *classified.transform();
    let nodata = classified.nodata();
    let crs = classified.crs().unwrap_or_default();

    let sums: Vec<f64> = (0..rows)
        .into_par_iter()
        .fold(
            || vec![0.0f64; 256],
            |mut acc, row| {
                let area = pixel_area_km2(&transform, crs, row);
                for col in 0..cols {
                    let class = unsafe { classified.get_unchecked(row, col) };
                    if Some(class) == nodata {
                        continue;
                    }
                    acc[class as usize] += area;
                }
                acc
            },
        )
        .reduce(
            || vec![0.0f64; 256],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        );

    let areas = sums
        .into_iter()
        .enumerate()
        .filter(|&(_, a)| a > 0.0)
        .map(|(class, a)| (class as u8, a))
        .collect();
    Ok(ClassAreaTable { areas })
}

/// Area of one pixel in the given row, in km².
fn pixel_area_km2(transform: &terraclass_core::GeoTransform, crs: Crs, row: usize) -> f64 {
    let m2 = match crs {
        Crs::Projected => (transform.pixel_width * transform.pixel_height).abs(),
        Crs::Geographic => {
            // Latitude of the row's pixel centers
            let (_, lat) = transform.pixel_to_geo(0, row);
            let width_m = transform.pixel_width.abs() * METRES_PER_DEG_LON * lat.to_radians().cos();
            let height_m = transform.pixel_height.abs() * METRES_PER_DEG_LAT;
            width_m * height_m
        }
    };
    m2 / 1e6
}
