//! Per-pixel raster classification
//!
//! Applies a fitted forest over a composite, pixel by pixel, producing a
//! u8 class raster with `u8::MAX` marking nodata and outside-AOI pixels.

use crate::classification::RandomForestClassifier;
use ndarray::Array2;
use rayon::prelude::*;
use terraclass_core::{AreaOfInterest, Error, ImageStack, Raster, Result};

/// Nodata sentinel for classified rasters. Valid class ids stay below it.
pub const CLASS_NODATA: u8 = u8::MAX;

/// Classify every AOI pixel of the stack using exactly `feature_bands`, in
/// order, as the model's feature vector.
///
/// Pixels outside the AOI or with any non-finite feature become
/// [`CLASS_NODATA`]. Deterministic for a fitted model.
pub fn classify_stack(
    forest: &RandomForestClassifier,
    stack: &ImageStack,
    feature_bands: &[String],
    aoi: &AreaOfInterest,
) -> Result<Raster<u8>> {
    if feature_bands.len() != forest.n_features() {
        return Err(Error::InvalidParameter {
            name: "feature_bands",
            value: feature_bands.len().to_string(),
            reason: format!("model expects {} features", forest.n_features()),
        });
    }
    let bands = stack.select(feature_bands)?;
    let transform = *stack.transform().ok_or(Error::InvalidParameter {
        name: "stack",
        value: "empty".into(),
        reason: "cannot classify a stack with no bands".into(),
    })?;

    let (rows, cols) = stack.shape();
    let mask = aoi.mask(&transform, rows, cols);

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![CLASS_NODATA; cols];
            let mut features = vec![0.0; bands.len()];
            for (col, out) in row_data.iter_mut().enumerate() {
                if unsafe { mask.get_unchecked(row, col) } == 0 {
                    continue;
                }
                let mut valid = true;
                for (slot, band) in features.iter_mut().zip(&bands) {
                    let v = unsafe { band.get_unchecked(row, col) };
                    if !v.is_finite() {
                        valid = false;
                        break;
                    }
                    *slot = v;
                }
                if valid {
                    *out = forest.vote(&features);
                }
            }
            row_data
        })
        .collect();

    let mut classified: Raster<u8> = bands[0].with_same_meta(rows, cols);
    classified.set_nodata(Some(CLASS_NODATA));
    *classified.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ForestConfig;
    use crate::sampling::SampleRecord;
    use terraclass_core::GeoTransform;

    fn gradient_stack() -> ImageStack {
        // 10x10 band ramping 0.0 .. 1.0 left to right
        let mut band: Raster<f64> = Raster::new(10, 10);
        band.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));
        for row in 0..10 {
            for col in 0..10 {
                band.set(row, col, col as f64 / 9.0).unwrap();
            }
        }
        band.set_nodata(Some(f64::NAN));
        let mut stack = ImageStack::new();
        stack.push_band("B4", band).unwrap();
        stack
    }

    fn fitted_forest() -> RandomForestClassifier {
        let records: Vec<SampleRecord> = (0..40)
            .map(|i| {
                let v = i as f64 / 39.0;
                SampleRecord {
                    features: vec![v],
                    label: u8::from(v > 0.5),
                }
            })
            .collect();
        RandomForestClassifier::fit(
            &records,
            2,
            ForestConfig {
                trees: 20,
                ..ForestConfig::default()
            },
        )
        .unwrap()
    }

    fn full_aoi() -> AreaOfInterest {
        AreaOfInterest::from_vertices(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
            .unwrap()
    }

    #[test]
    fn test_classifies_left_low_right_high() {
        let stack = gradient_stack();
        let forest = fitted_forest();

        let out = classify_stack(&forest, &stack, &["B4".to_string()], &full_aoi()).unwrap();
        assert_eq!(out.get(5, 0).unwrap(), 0);
        assert_eq!(out.get(5, 9).unwrap(), 1);
        assert_eq!(out.nodata(), Some(CLASS_NODATA));
    }

    #[test]
    fn test_outside_aoi_is_nodata() {
        let stack = gradient_stack();
        let forest = fitted_forest();
        // Left half only
        let aoi = AreaOfInterest::from_vertices(&[
            (0.0, 0.0),
            (5.0, 0.0),
            (5.0, 10.0),
            (0.0, 10.0),
        ])
        .unwrap();

        let out = classify_stack(&forest, &stack, &["B4".to_string()], &aoi).unwrap();
        assert_eq!(out.get(5, 2).unwrap(), 0);
        assert_eq!(out.get(5, 8).unwrap(), CLASS_NODATA);
    }

    #[test]
    fn test_nan_feature_is_nodata() {
        let mut band = gradient_stack().band("B4").unwrap().clone();
        band.set(3, 3, f64::NAN).unwrap();
        let mut patched = ImageStack::new();
        patched.push_band("B4", band).unwrap();

        let out =
            classify_stack(&fitted_forest(), &patched, &["B4".to_string()], &full_aoi()).unwrap();
        assert_eq!(out.get(3, 3).unwrap(), CLASS_NODATA);
    }

    #[test]
    fn test_idempotent() {
        let stack = gradient_stack();
        let forest = fitted_forest();
        let bands = ["B4".to_string()];

        let first = classify_stack(&forest, &stack, &bands, &full_aoi()).unwrap();
        let second = classify_stack(&forest, &stack, &bands, &full_aoi()).unwrap();
        assert_eq!(first.data(), second.data());
    }

    #[test]
    fn test_band_count_mismatch() {
        let stack = gradient_stack();
        let forest = fitted_forest();
        let bands = ["B4".to_string(), "B8".to_string()];
        assert!(classify_stack(&forest, &stack, &bands, &full_aoi()).is_err());
    }
}
