//! Training-region sampling
//!
//! Turns labeled polygons into labeled feature vectors by sampling the
//! composite at every pixel center that falls inside a training polygon.

use geo::Contains;
use geo_types::Point;
use terraclass_core::{ImageStack, Result, TrainingSet};
use tracing::warn;

/// One labeled observation: the feature vector in stack band order plus the
/// ground-truth class id.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub features: Vec<f64>,
    pub label: u8,
}

/// Extract one `SampleRecord` per pixel center covered by a training
/// polygon, at the stack's native grid.
///
/// Overlapping polygons with conflicting labels are resolved by declaration
/// order: the earliest polygon containing the pixel center wins. The number
/// of contested pixels is reported once per run as a warning. Pixels with
/// any non-finite feature value are skipped.
pub fn sample_regions(stack: &ImageStack, training: &TrainingSet) -> Result<Vec<SampleRecord>> {
    let (rows, cols) = stack.shape();
    let bands: Vec<_> = stack.iter().map(|(_, b)| b).collect();

    let mut records = Vec::new();
    let mut contested: u64 = 0;

    for row in 0..rows {
        for col in 0..cols {
            let (x, y) = match stack.transform() {
                Some(t) => t.pixel_to_geo(col, row),
                None => continue,
            };
            let center = Point::new(x, y);

            let mut label = None;
            for polygon in training.iter() {
                if polygon.geometry.contains(&center) {
                    match label {
                        None => label = Some(polygon.landcover),
                        Some(first) => {
                            if polygon.landcover != first {
                                contested += 1;
                                break;
                            }
                        }
                    }
                }
            }
            let Some(label) = label else { continue };

            let features: Vec<f64> = bands
                .iter()
                .map(|b| unsafe { b.get_unchecked(row, col) })
                .collect();
            if features.iter().any(|v| !v.is_finite()) {
                continue;
            }
            records.push(SampleRecord { features, label });
        }
    }

    if contested > 0 {
        warn!(
            pixels = contested,
            "training polygons with conflicting labels overlap; kept first-declared label"
        );
    }

    Ok(records)
}
