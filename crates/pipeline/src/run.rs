//! Run orchestration
//!
//! Executes the classification stages strictly in order. Any stage error
//! aborts the run; the export stage only runs once everything before it
//! succeeded, so a failed run never leaves a partial output file.

use crate::config::RunConfig;
use std::path::PathBuf;
use terraclass_algorithms::{
    append_indices, class_areas, classify_stack, sample_regions, train_test_split,
    ClassAreaTable, ConfusionMatrix, ForestConfig, RandomForestClassifier,
};
use terraclass_archive::{median_composite, ArchiveError, SceneQuery, SceneStore};
use terraclass_core::io::write_geotiff;
use terraclass_core::Raster;
use thiserror::Error;
use tracing::info;

/// Terminal failure of a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] terraclass_core::Error),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub scenes_used: usize,
    pub samples: usize,
    pub train_count: usize,
    pub test_count: usize,
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub kappa: Option<f64>,
    pub areas: ClassAreaTable,
    pub exported_path: PathBuf,
}

/// Execute one classification run against a scene store.
pub fn run(config: &RunConfig, store: &dyn SceneStore) -> Result<RunReport> {
    config.validate()?;
    let aoi = config.aoi()?;
    let training = config.training_set()?;
    let n_classes = config.n_classes();

    let query = SceneQuery::new()
        .bbox(aoi.bounding_box())
        .dates(config.start_date, config.end_date)
        .max_cloud(config.max_cloud)
        .bands(config.bands.iter().cloned());
    let scenes = store.query(&query)?;
    info!(count = scenes.len(), "scenes passed the archive query");

    let mut composite = median_composite(&scenes, &config.bands, &aoi, config.resolution)?;
    append_indices(&mut composite)?;
    let feature_bands: Vec<String> = composite
        .band_names()
        .into_iter()
        .map(String::from)
        .collect();
    info!(
        rows = composite.shape().0,
        cols = composite.shape().1,
        bands = feature_bands.len(),
        "composite ready"
    );

    let samples = sample_regions(&composite, &training)?;
    let sample_count = samples.len();
    let (train, test) = train_test_split(samples, config.train_fraction, config.seed)?;
    info!(
        samples = sample_count,
        train = train.len(),
        test = test.len(),
        "training samples split"
    );

    let forest_config = ForestConfig {
        trees: config.trees,
        seed: config.seed,
        ..ForestConfig::default()
    };
    let forest = RandomForestClassifier::fit(&train, n_classes, forest_config)?;

    let mut classified = classify_stack(&forest, &composite, &feature_bands, &aoi)?;
    classified.set_crs(Some(config.crs));

    let pairs = test
        .iter()
        .map(|record| Ok((record.label, forest.predict(&record.features)?)))
        .collect::<std::result::Result<Vec<_>, terraclass_core::Error>>()?;
    let confusion = ConfusionMatrix::from_pairs(&pairs, n_classes)?;
    let accuracy = confusion.accuracy();
    let kappa = confusion.kappa();
    info!(accuracy, ?kappa, "accuracy assessment complete");

    let areas = class_areas(&classified, config.max_pixels)?;

    export(&classified, config)?;
    info!(path = %config.export_path.display(), "classified raster exported");

    Ok(RunReport {
        scenes_used: scenes.len(),
        samples: sample_count,
        train_count: train.len(),
        test_count: test.len(),
        confusion,
        accuracy,
        kappa,
        areas,
        exported_path: config.export_path.clone(),
    })
}

fn export(classified: &Raster<u8>, config: &RunConfig) -> Result<()> {
    if let Some(parent) = config.export_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(terraclass_core::Error::Io)?;
        }
    }
    write_geotiff(classified, &config.export_path)?;
    Ok(())
}
