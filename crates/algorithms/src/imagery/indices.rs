//! Spectral indices
//!
//! Normalized-difference indices derived from the composite's surface
//! reflectance bands. Appended to the stack, they become additional
//! classifier features alongside the raw bands.

use ndarray::Array2;
use rayon::prelude::*;
use terraclass_core::raster::Raster;
use terraclass_core::{Error, ImageStack, Result};

/// Compute the normalized difference between two bands:
///
/// `(band_a - band_b) / (band_a + band_b)`
///
/// Result is in [-1, 1]. Pixels where the denominator vanishes or either
/// input is nodata become NaN.
pub fn normalized_difference(band_a: &Raster<f64>, band_b: &Raster<f64>) -> Result<Raster<f64>> {
    check_dimensions(band_a, band_b)?;

    let (rows, cols) = band_a.shape();
    let nodata_a = band_a.nodata();
    let nodata_b = band_b.nodata();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let a = unsafe { band_a.get_unchecked(row, col) };
                let b = unsafe { band_b.get_unchecked(row, col) };

                if is_nodata_f64(a, nodata_a) || is_nodata_f64(b, nodata_b) {
                    continue;
                }

                let sum = a + b;
                if sum.abs() < 1e-10 {
                    continue; // Avoid division by zero
                }

                row_data[col] = (a - b) / sum;
            }
            row_data
        })
        .collect();

    build_output(band_a, rows, cols, data)
}

/// Normalized Difference Vegetation Index
///
/// `NDVI = (NIR - Red) / (NIR + Red)`
///
/// Dense vegetation scores high, water and built surfaces score at or
/// below zero.
pub fn ndvi(nir: &Raster<f64>, red: &Raster<f64>) -> Result<Raster<f64>> {
    normalized_difference(nir, red)
}

/// Normalized Difference Water Index (McFeeters, 1996)
///
/// `NDWI = (Green - NIR) / (Green + NIR)`
///
/// Positive values indicate open water.
pub fn ndwi(green: &Raster<f64>, nir: &Raster<f64>) -> Result<Raster<f64>> {
    normalized_difference(green, nir)
}

/// Normalized Difference Built-up Index (Zha et al., 2003)
///
/// `NDBI = (SWIR - NIR) / (SWIR + NIR)`
///
/// Positive values indicate built-up and bare surfaces.
pub fn ndbi(swir: &Raster<f64>, nir: &Raster<f64>) -> Result<Raster<f64>> {
    normalized_difference(swir, nir)
}

/// Compute NDVI, NDWI and NDBI from a Sentinel-2 style composite and append
/// them as the `NDVI`, `NDWI` and `NDBI` bands.
///
/// Requires the `B3` (green), `B4` (red), `B8` (NIR) and `B11` (SWIR) bands.
/// The resulting band order fixes the classifier's feature layout.
pub fn append_indices(stack: &mut ImageStack) -> Result<()> {
    let green = stack.band("B3")?;
    let red = stack.band("B4")?;
    let nir = stack.band("B8")?;
    let swir = stack.band("B11")?;

    let ndvi_band = ndvi(nir, red)?;
    let ndwi_band = ndwi(green, nir)?;
    let ndbi_band = ndbi(swir, nir)?;

    stack.push_band("NDVI", ndvi_band)?;
    stack.push_band("NDWI", ndwi_band)?;
    stack.push_band("NDBI", ndbi_band)?;
    Ok(())
}

fn is_nodata_f64(value: f64, nodata: Option<f64>) -> bool {
    if value.is_nan() {
        return true;
    }
    match nodata {
        Some(nd) => (value - nd).abs() < f64::EPSILON,
        None => false,
    }
}

fn check_dimensions(a: &Raster<f64>, b: &Raster<f64>) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(Error::SizeMismatch {
            er: a.rows(),
            ec: a.cols(),
            ar: b.rows(),
            ac: b.cols(),
        });
    }
    Ok(())
}

fn build_output(
    template: &Raster<f64>,
    rows: usize,
    cols: usize,
    data: Vec<f64>,
) -> Result<Raster<f64>> {
    let mut output = template.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(output)
}
