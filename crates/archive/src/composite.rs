//! Temporal median compositing
//!
//! Reduces a set of filtered scenes to one cloud-robust image: per pixel and
//! per band, the median of all valid observations, on a grid derived from
//! the area of interest, clipped to the AOI polygon.

use crate::error::{ArchiveError, Result};
use crate::scene::Scene;
use rayon::prelude::*;
use terraclass_core::{AreaOfInterest, ImageStack, Raster};
use tracing::warn;

/// Composite `scenes` into one `ImageStack` with the requested bands.
///
/// The output grid covers the AOI bounding box at `cell_size`; pixels whose
/// center falls outside the AOI polygon are NaN. Pixels inside the AOI with
/// zero valid observations across all scenes are NaN as well and counted in
/// a single data-availability warning.
pub fn median_composite(
    scenes: &[&Scene],
    bands: &[String],
    aoi: &AreaOfInterest,
    cell_size: f64,
) -> Result<ImageStack> {
    if scenes.is_empty() {
        return Err(ArchiveError::DataUnavailable(
            "cannot composite zero scenes".into(),
        ));
    }
    for band in bands {
        for scene in scenes {
            if !scene.bands.contains_band(band) {
                return Err(ArchiveError::DataUnavailable(format!(
                    "scene {} lacks band {}",
                    scene.id, band
                )));
            }
        }
    }

    let (transform, rows, cols) = aoi.grid(cell_size)?;
    let mask = aoi.mask(&transform, rows, cols);

    let mut stack = ImageStack::new();
    for band in bands {
        let sources: Vec<&Raster<f64>> = scenes
            .iter()
            .map(|s| s.bands.band(band))
            .collect::<terraclass_core::Result<_>>()?;

        let data: Vec<f64> = (0..rows)
            .into_par_iter()
            .flat_map(|row| {
                let mut row_data = vec![f64::NAN; cols];
                let mut samples = Vec::with_capacity(sources.len());
                for (col, out) in row_data.iter_mut().enumerate() {
                    if unsafe { mask.get_unchecked(row, col) } == 0 {
                        continue;
                    }
                    let (x, y) = transform.pixel_to_geo(col, row);
                    samples.clear();
                    for src in &sources {
                        if let Some(v) = src.sample(x, y) {
                            if v.is_finite() && !src.is_nodata(v) {
                                samples.push(v);
                            }
                        }
                    }
                    if let Some(m) = median(&mut samples) {
                        *out = m;
                    }
                }
                row_data
            })
            .collect();

        let mut out: Raster<f64> = Raster::from_vec(data, rows, cols)?;
        out.set_transform(transform);
        out.set_nodata(Some(f64::NAN));
        stack.push_band(band.clone(), out)?;
    }

    let uncovered = count_uncovered(&stack, &mask);
    if uncovered > 0 {
        warn!(
            pixels = uncovered,
            scenes = scenes.len(),
            "AOI pixels with no valid observation in any scene"
        );
    }

    Ok(stack)
}

/// Median of a mutable sample buffer. Empty input yields None.
fn median(samples: &mut [f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = samples.len();
    if n % 2 == 0 {
        Some((samples[n / 2 - 1] + samples[n / 2]) / 2.0)
    } else {
        Some(samples[n / 2])
    }
}

/// Count AOI-interior pixels where every band is NaN.
fn count_uncovered(stack: &ImageStack, mask: &Raster<u8>) -> u64 {
    let (rows, cols) = stack.shape();
    let bands: Vec<_> = stack.iter().map(|(_, b)| b).collect();
    let mut uncovered = 0;
    for row in 0..rows {
        for col in 0..cols {
            if unsafe { mask.get_unchecked(row, col) } == 0 {
                continue;
            }
            let all_nan = bands
                .iter()
                .all(|b| unsafe { b.get_unchecked(row, col) }.is_nan());
            if all_nan {
                uncovered += 1;
            }
        }
    }
    uncovered
}
