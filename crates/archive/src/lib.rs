//! # Terraclass Archive
//!
//! Local imagery archive for the terraclass pipeline: scene metadata,
//! date/cloud/bbox queries, and per-pixel temporal median compositing.
//!
//! The archive is the seam where a remote catalog would plug in; the
//! implementations here read scenes from memory or from a directory of
//! GeoTIFF bands with a JSON catalog index.

mod composite;
mod error;
mod scene;
mod store;

pub use composite::median_composite;
pub use error::{ArchiveError, Result};
pub use scene::{Scene, SceneQuery};
pub use store::{CatalogEntry, CatalogIndex, DirectoryStore, MemoryStore, SceneStore};
