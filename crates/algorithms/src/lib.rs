//! # terraclass-algorithms
//!
//! The analytical stages of the classification pipeline: spectral index
//! computation, training-polygon sampling, train/test splitting, random
//! forest classification, accuracy assessment and per-class area summaries.
//!
//! All per-pixel stages are row-parallel via rayon and treat NaN as the
//! universal invalid-value marker for f64 imagery.

pub mod accuracy;
pub mod area;
pub mod classification;
pub mod imagery;
pub mod sampling;
pub mod split;

pub use accuracy::ConfusionMatrix;
pub use area::{class_areas, ClassAreaTable};
pub use classification::{classify_stack, ForestConfig, RandomForestClassifier, CLASS_NODATA};
pub use imagery::{append_indices, ndbi, ndvi, ndwi, normalized_difference};
pub use sampling::{sample_regions, SampleRecord};
pub use split::train_test_split;
