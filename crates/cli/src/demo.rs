//! Synthetic demo archive
//!
//! Writes a small two-class scene archive plus a matching run configuration
//! to disk, so the full pipeline can be exercised without real imagery.
//! The tile's left half imitates vegetation (high NIR), the right half
//! water (high green, low NIR).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use terraclass_archive::{CatalogEntry, CatalogIndex};
use terraclass_core::io::write_geotiff;
use terraclass_core::{Crs, GeoTransform, Raster};
use terraclass_pipeline::{ClassDef, RunConfig, TrainingRegion};

// (band, vegetation value, water value)
const BANDS: [(&str, f64, f64); 5] = [
    ("B2", 0.05, 0.06),
    ("B3", 0.08, 0.10),
    ("B4", 0.06, 0.05),
    ("B8", 0.50, 0.02),
    ("B11", 0.20, 0.01),
];

const SCENES: [(&str, f64, f64); 3] = [
    ("2023-11-01", 2.0, 0.000),
    ("2023-12-15", 5.0, 0.002),
    ("2024-02-01", 3.0, -0.002),
];

const SIZE: usize = 40;

/// Write archive, scenes and config under `output`; returns the parsed
/// config and the archive directory.
pub fn generate(output: &Path) -> Result<(RunConfig, PathBuf)> {
    let archive = output.join("archive");
    std::fs::create_dir_all(&archive).context("Cannot create archive directory")?;

    let mut entries = Vec::new();
    for (date, cloud, offset) in SCENES {
        let mut bands = std::collections::BTreeMap::new();
        for (name, veg, water) in BANDS {
            let file = format!("{date}_{name}.tif");
            write_geotiff(&synthetic_band(veg, water, offset), archive.join(&file))
                .context("Cannot write demo band")?;
            bands.insert(name.to_string(), PathBuf::from(file));
        }
        entries.push(CatalogEntry {
            id: format!("demo-{date}"),
            date: date.parse().context("Bad demo scene date")?,
            cloud_cover: cloud,
            bands,
        });
    }
    let index = CatalogIndex { scenes: entries };
    std::fs::write(
        archive.join("index.json"),
        serde_json::to_string_pretty(&index).context("Cannot serialize catalog index")?,
    )
    .context("Cannot write catalog index")?;

    let config = demo_config(output);
    std::fs::write(
        output.join("run.json"),
        serde_json::to_string_pretty(&config).context("Cannot serialize run config")?,
    )
    .context("Cannot write run config")?;

    Ok((config, archive))
}

fn synthetic_band(veg: f64, water: f64, offset: f64) -> Raster<f64> {
    let mut band: Raster<f64> = Raster::new(SIZE, SIZE);
    band.set_transform(GeoTransform::new(0.0, SIZE as f64, 1.0, -1.0));
    for row in 0..SIZE {
        for col in 0..SIZE {
            let value = if col < SIZE / 2 { veg } else { water };
            // The set is in bounds by construction
            let _ = band.set(row, col, value + offset);
        }
    }
    band.set_nodata(Some(f64::NAN));
    band
}

fn demo_config(output: &Path) -> RunConfig {
    let extent = SIZE as f64;
    let mid = extent / 2.0;
    RunConfig {
        aoi: vec![[0.0, 0.0], [extent, 0.0], [extent, extent], [0.0, extent]],
        crs: Crs::Projected,
        start_date: "2023-10-01".parse().unwrap(),
        end_date: "2024-03-31".parse().unwrap(),
        max_cloud: 10.0,
        bands: BANDS.iter().map(|(name, _, _)| name.to_string()).collect(),
        classes: vec![
            ClassDef {
                name: "Vegetation".into(),
                color: "#1b7837".into(),
            },
            ClassDef {
                name: "Water".into(),
                color: "#2166ac".into(),
            },
        ],
        training: vec![
            TrainingRegion {
                landcover: 0,
                vertices: vec![[2.0, 2.0], [mid - 2.0, 2.0], [mid - 2.0, mid], [2.0, mid]],
            },
            TrainingRegion {
                landcover: 1,
                vertices: vec![
                    [mid + 2.0, 2.0],
                    [extent - 2.0, 2.0],
                    [extent - 2.0, mid],
                    [mid + 2.0, mid],
                ],
            },
        ],
        train_fraction: 0.7,
        trees: 50,
        seed: 42,
        resolution: 1.0,
        max_pixels: 1_000_000,
        export_path: output.join("classified.tif"),
    }
}
