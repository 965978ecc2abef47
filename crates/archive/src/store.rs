//! Scene stores
//!
//! `SceneStore` is the seam between the pipeline and whatever holds the
//! imagery. `MemoryStore` owns scenes directly; `DirectoryStore` loads them
//! from a directory of per-band GeoTIFFs described by a JSON catalog index.

use crate::error::{ArchiveError, Result};
use crate::scene::{Scene, SceneQuery};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use terraclass_core::io::read_geotiff;
use terraclass_core::{ImageStack, Raster};
use tracing::info;

/// Source of archived scenes.
pub trait SceneStore {
    /// All scenes held by this store.
    fn scenes(&self) -> &[Scene];

    /// Scenes passing a query's filters.
    ///
    /// Fails with `DataUnavailable` when nothing matches: a silent empty
    /// result would surface later as an all-nodata composite.
    fn query(&self, query: &SceneQuery) -> Result<Vec<&Scene>> {
        let hits: Vec<&Scene> = self.scenes().iter().filter(|s| query.matches(s)).collect();
        if hits.is_empty() {
            return Err(ArchiveError::DataUnavailable(format!(
                "no scene matches date range {:?}..{:?} with cloud cover < {:?}",
                query.start, query.end, query.max_cloud
            )));
        }
        Ok(hits)
    }
}

/// In-memory store, used by tests and the synthetic demo.
#[derive(Debug, Default)]
pub struct MemoryStore {
    scenes: Vec<Scene>,
}

impl MemoryStore {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    pub fn push(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }
}

impl SceneStore for MemoryStore {
    fn scenes(&self) -> &[Scene] {
        &self.scenes
    }
}

// ---------------------------------------------------------------------------
// Directory-backed store
// ---------------------------------------------------------------------------

/// Catalog index file (`index.json`) of a directory archive.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub scenes: Vec<CatalogEntry>,
}

/// One scene entry in the catalog index.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub date: NaiveDate,
    pub cloud_cover: f64,
    /// Band name -> GeoTIFF path, relative to the index file.
    pub bands: BTreeMap<String, PathBuf>,
}

/// Store reading scenes from a directory of GeoTIFF bands.
///
/// Layout: `index.json` plus one single-band GeoTIFF per (scene, band).
/// All scenes are loaded eagerly at open time; the archives this tool works
/// with are a handful of clipped tiles, not a global catalog.
#[derive(Debug)]
pub struct DirectoryStore {
    scenes: Vec<Scene>,
}

impl DirectoryStore {
    /// Open an archive directory containing `index.json`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let index_path = dir.join("index.json");
        let raw = std::fs::read_to_string(&index_path)?;
        let index: CatalogIndex = serde_json::from_str(&raw)
            .map_err(|e| ArchiveError::Index(format!("{}: {}", index_path.display(), e)))?;

        let mut scenes = Vec::with_capacity(index.scenes.len());
        for entry in index.scenes {
            if entry.bands.is_empty() {
                return Err(ArchiveError::Index(format!(
                    "scene {} lists no bands",
                    entry.id
                )));
            }
            let mut bands = ImageStack::new();
            for (name, rel) in &entry.bands {
                let band: Raster<f64> = read_geotiff(dir.join(rel))?;
                bands.push_band(name.clone(), band)?;
            }
            scenes.push(Scene {
                id: entry.id,
                date: entry.date,
                cloud_cover: entry.cloud_cover,
                bands,
            });
        }
        info!(count = scenes.len(), dir = %dir.display(), "opened scene archive");
        Ok(Self { scenes })
    }
}

impl SceneStore for DirectoryStore {
    fn scenes(&self) -> &[Scene] {
        &self.scenes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terraclass_core::io::write_geotiff;
    use terraclass_core::GeoTransform;

    fn mem_scene(date: &str, cloud: f64, value: f64) -> Scene {
        let mut band = Raster::filled(2, 2, value);
        band.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));
        let mut bands = ImageStack::new();
        bands.push_band("B4", band).unwrap();
        Scene {
            id: format!("s-{date}"),
            date: date.parse().unwrap(),
            cloud_cover: cloud,
            bands,
        }
    }

    #[test]
    fn test_query_empty_is_unavailable() {
        let store = MemoryStore::new(vec![mem_scene("2023-11-01", 50.0, 0.1)]);
        let q = SceneQuery::new().max_cloud(10.0);
        assert!(matches!(
            store.query(&q),
            Err(ArchiveError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_query_filters() {
        let store = MemoryStore::new(vec![
            mem_scene("2023-11-01", 2.0, 0.1),
            mem_scene("2023-12-01", 50.0, 0.2),
            mem_scene("2024-06-01", 1.0, 0.3),
        ]);
        let q = SceneQuery::new()
            .dates("2023-10-01".parse().unwrap(), "2024-03-31".parse().unwrap())
            .max_cloud(10.0);
        let hits = store.query(&q).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "s-2023-11-01");
    }

    #[test]
    fn test_directory_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();

        let mut band = Raster::filled(3, 3, 0.42_f64);
        band.set_transform(GeoTransform::new(78.0, 30.0, 0.01, -0.01));
        write_geotiff(&band, dir.path().join("s1_B4.tif")).unwrap();

        let index = CatalogIndex {
            scenes: vec![CatalogEntry {
                id: "s1".into(),
                date: "2023-11-05".parse().unwrap(),
                cloud_cover: 3.5,
                bands: [("B4".to_string(), PathBuf::from("s1_B4.tif"))]
                    .into_iter()
                    .collect(),
            }],
        };
        std::fs::write(
            dir.path().join("index.json"),
            serde_json::to_string_pretty(&index).unwrap(),
        )
        .unwrap();

        let store = DirectoryStore::open(dir.path()).unwrap();
        assert_eq!(store.scenes().len(), 1);
        let scene = &store.scenes()[0];
        assert_eq!(scene.cloud_cover, 3.5);
        let b4 = scene.bands.band("B4").unwrap();
        assert!((b4.get(1, 1).unwrap() - 0.42).abs() < 1e-6);
    }

    #[test]
    fn test_directory_store_bad_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.json"), "{not json").unwrap();
        assert!(matches!(
            DirectoryStore::open(dir.path()),
            Err(ArchiveError::Index(_))
        ));
    }
}
