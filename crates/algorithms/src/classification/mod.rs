//! Supervised classification
//!
//! A hand-rolled random forest over CART decision trees, plus the raster
//! kernel that applies a fitted model per pixel.

mod classify;
mod forest;
mod tree;

pub use classify::{classify_stack, CLASS_NODATA};
pub use forest::{ForestConfig, RandomForestClassifier};
