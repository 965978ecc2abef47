//! Imagery transforms operating on composite bands

mod indices;

pub use indices::{append_indices, ndbi, ndvi, ndwi, normalized_difference};
