//! End-to-end pipeline run over a synthetic in-memory archive.
//!
//! The scene is a 20x20 meter-grid tile whose left half looks like
//! vegetation (high NIR) and whose right half looks like water (high green,
//! low NIR). Training squares sit well inside each half, so a fitted forest
//! must separate the halves perfectly.

use approx::assert_relative_eq;
use terraclass_archive::{ArchiveError, MemoryStore, Scene};
use terraclass_core::io::read_geotiff;
use terraclass_core::{Crs, GeoTransform, ImageStack, Raster};
use terraclass_pipeline::{run, ClassDef, PipelineError, RunConfig, TrainingRegion};

// (band, vegetation value, water value)
const BANDS: [(&str, f64, f64); 5] = [
    ("B2", 0.05, 0.06),
    ("B3", 0.08, 0.10),
    ("B4", 0.06, 0.05),
    ("B8", 0.50, 0.02),
    ("B11", 0.20, 0.01),
];

fn half_and_half_band(veg: f64, water: f64, offset: f64) -> Raster<f64> {
    let mut band: Raster<f64> = Raster::new(20, 20);
    band.set_transform(GeoTransform::new(0.0, 20.0, 1.0, -1.0));
    for row in 0..20 {
        for col in 0..20 {
            let value = if col < 10 { veg } else { water };
            band.set(row, col, value + offset).unwrap();
        }
    }
    band.set_nodata(Some(f64::NAN));
    band
}

fn scene(date: &str, cloud: f64, offset: f64) -> Scene {
    let mut bands = ImageStack::new();
    for (name, veg, water) in BANDS {
        bands
            .push_band(name, half_and_half_band(veg, water, offset))
            .unwrap();
    }
    Scene {
        id: format!("synthetic-{date}"),
        date: date.parse().unwrap(),
        cloud_cover: cloud,
        bands,
    }
}

fn store() -> MemoryStore {
    MemoryStore::new(vec![
        scene("2023-11-01", 2.0, 0.000),
        scene("2023-12-15", 5.0, 0.002),
        scene("2024-02-01", 3.0, -0.002),
        // Too cloudy, must be filtered out
        scene("2024-01-10", 55.0, 0.5),
    ])
}

fn config(export_path: std::path::PathBuf) -> RunConfig {
    RunConfig {
        aoi: vec![[0.0, 0.0], [20.0, 0.0], [20.0, 20.0], [0.0, 20.0]],
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
                vertices: vec![[2.0, 2.0], [8.0, 2.0], [8.0, 8.0], [2.0, 8.0]],
            },
            TrainingRegion {
                landcover: 1,
                vertices: vec![[12.0, 2.0], [18.0, 2.0], [18.0, 8.0], [12.0, 8.0]],
            },
        ],
        train_fraction: 0.7,
        trees: 30,
        seed: 42,
        resolution: 1.0,
        max_pixels: 1_000_000,
        export_path,
    }
}

#[test]
fn full_run_classifies_separable_halves() {
    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join("classified.tif");

    let report = run(&config(export_path.clone()), &store()).unwrap();

    assert_eq!(report.scenes_used, 3);
    assert_eq!(report.train_count + report.test_count, report.samples);
    // 36 candidate pixels per training square
    assert_eq!(report.samples, 72);

    // Fully separable classes: perfect held-out accuracy
    assert_relative_eq!(report.accuracy, 1.0);
    assert_relative_eq!(report.kappa.unwrap(), 1.0);

    // 400 one-square-meter pixels, split evenly between the halves
    assert_relative_eq!(report.areas.total_km2(), 400.0 / 1e6, epsilon = 1e-12);
    assert_relative_eq!(report.areas.km2(0), 200.0 / 1e6, epsilon = 1e-12);
    assert_relative_eq!(report.areas.km2(1), 200.0 / 1e6, epsilon = 1e-12);

    // Exported raster holds the same classes
    let classified: Raster<u8> = read_geotiff(&export_path).unwrap();
    assert_eq!(classified.shape(), (20, 20));
    assert_eq!(classified.get(10, 3).unwrap(), 0);
    assert_eq!(classified.get(10, 16).unwrap(), 1);
}

#[test]
fn run_is_deterministic_for_a_seed() {
    let dir = tempfile::tempdir().unwrap();
    let a = run(&config(dir.path().join("a.tif")), &store()).unwrap();
    let b = run(&config(dir.path().join("b.tif")), &store()).unwrap();

    assert_eq!(a.train_count, b.train_count);
    assert_eq!(a.confusion, b.confusion);
    assert_eq!(a.areas, b.areas);
}

#[test]
fn empty_query_aborts_before_export() {
    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join("never.tif");
    let mut config = config(export_path.clone());
    config.start_date = "2020-01-01".parse().unwrap();
    config.end_date = "2020-12-31".parse().unwrap();

    let err = run(&config, &store()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Archive(ArchiveError::DataUnavailable(_))
    ));
    assert!(!export_path.exists());
}

#[test]
fn pixel_budget_aborts_before_export() {
    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join("never.tif");
    let mut config = config(export_path.clone());
    config.max_pixels = 100;

    let err = run(&config, &store()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Core(terraclass_core::Error::BudgetExceeded { .. })
    ));
    assert!(!export_path.exists());
}
