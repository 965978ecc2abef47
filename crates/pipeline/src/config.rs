//! Run configuration
//!
//! The entire configuration surface of a classification run, loaded from a
//! JSON file. Defaults mirror a typical Sentinel-2 setup: 10% cloud cap,
//! 0.7 train fraction, 300 trees, the five-band visible/NIR/SWIR list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use terraclass_core::{AreaOfInterest, Crs, Error, Result, TrainingPolygon, TrainingSet};

/// One land-cover class: display name plus `#RRGGBB` map color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub color: String,
}

/// One labeled training polygon in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRegion {
    pub landcover: u8,
    /// Vertices as `[x, y]` pairs; the ring closes implicitly.
    pub vertices: Vec<[f64; 2]>,
}

/// Full configuration of one classification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// AOI polygon vertices as `[x, y]` pairs.
    pub aoi: Vec<[f64; 2]>,
    /// Coordinate system of the AOI and all scene grids.
    #[serde(default)]
    pub crs: Crs,
    /// First acquisition date considered, inclusive.
    pub start_date: NaiveDate,
    /// End of the acquisition window, exclusive.
    pub end_date: NaiveDate,
    /// Scenes at or above this cloud percentage are rejected.
    #[serde(default = "default_max_cloud")]
    pub max_cloud: f64,
    /// Spectral bands composited and fed to the classifier.
    #[serde(default = "default_bands")]
    pub bands: Vec<String>,
    /// Classes, indexed by position; class ids are 0-based.
    pub classes: Vec<ClassDef>,
    pub training: Vec<TrainingRegion>,
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
    #[serde(default = "default_trees")]
    pub trees: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Output grid cell size in AOI coordinate units.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    /// Upper bound on classified pixels per run.
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
    /// Destination GeoTIFF for the classified raster.
    pub export_path: PathBuf,
}

fn default_max_cloud() -> f64 {
    10.0
}

fn default_bands() -> Vec<String> {
    ["B2", "B3", "B4", "B8", "B11"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_train_fraction() -> f64 {
    0.7
}

fn default_trees() -> usize {
    300
}

fn default_seed() -> u64 {
    42
}

fn default_resolution() -> f64 {
    10.0
}

fn default_max_pixels() -> u64 {
    10_000_000_000_000
}

// Index features require these source bands.
const INDEX_SOURCE_BANDS: [&str; 4] = ["B3", "B4", "B8", "B11"];

impl RunConfig {
    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| Error::InvalidParameter {
            name: "config",
            value: path.as_ref().display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every cross-field constraint a run depends on.
    pub fn validate(&self) -> Result<()> {
        if self.aoi.len() < 3 {
            return Err(invalid("aoi", self.aoi.len(), "at least 3 vertices required"));
        }
        if self.bands.is_empty() {
            return Err(invalid("bands", 0, "at least one band required"));
        }
        for (i, band) in self.bands.iter().enumerate() {
            if self.bands[..i].contains(band) {
                return Err(Error::InvalidParameter {
                    name: "bands",
                    value: band.clone(),
                    reason: "duplicate band name".into(),
                });
            }
        }
        for required in INDEX_SOURCE_BANDS {
            if !self.bands.iter().any(|b| b == required) {
                return Err(Error::InvalidParameter {
                    name: "bands",
                    value: required.to_string(),
                    reason: "band is required for spectral indices".into(),
                });
            }
        }
        if self.classes.is_empty() || self.classes.len() > u8::MAX as usize {
            return Err(invalid("classes", self.classes.len(), "1 to 255 classes supported"));
        }
        for class in &self.classes {
            if !is_hex_color(&class.color) {
                return Err(Error::InvalidParameter {
                    name: "classes",
                    value: class.color.clone(),
                    reason: "color must be #RRGGBB".into(),
                });
            }
        }
        if self.training.is_empty() {
            return Err(invalid("training", 0, "at least one training region required"));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(Error::InvalidParameter {
                name: "train_fraction",
                value: self.train_fraction.to_string(),
                reason: "must lie strictly between 0 and 1".into(),
            });
        }
        if self.trees == 0 {
            return Err(invalid("trees", 0, "at least one tree required"));
        }
        if !(self.resolution > 0.0) {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: self.resolution.to_string(),
                reason: "must be positive".into(),
            });
        }
        if self.max_pixels == 0 {
            return Err(invalid("max_pixels", 0, "pixel budget must be positive"));
        }
        if self.end_date <= self.start_date {
            return Err(Error::InvalidParameter {
                name: "end_date",
                value: self.end_date.to_string(),
                reason: "must fall after start_date (the end is exclusive)".into(),
            });
        }

        // Training labels must fit the declared class list
        self.training_set()?.validate_labels(self.n_classes())?;
        Ok(())
    }

    pub fn n_classes(&self) -> u8 {
        self.classes.len() as u8
    }

    /// Build the AOI polygon from the configured vertices.
    pub fn aoi(&self) -> Result<AreaOfInterest> {
        let vertices: Vec<(f64, f64)> = self.aoi.iter().map(|&[x, y]| (x, y)).collect();
        AreaOfInterest::from_vertices(&vertices)
    }

    /// Build the merged training set, preserving declaration order.
    pub fn training_set(&self) -> Result<TrainingSet> {
        let mut set = TrainingSet::new();
        for region in &self.training {
            let vertices: Vec<(f64, f64)> = region.vertices.iter().map(|&[x, y]| (x, y)).collect();
            set.push(TrainingPolygon::from_vertices(&vertices, region.landcover)?);
        }
        Ok(set)
    }
}

fn invalid(name: &'static str, value: usize, reason: &str) -> Error {
    Error::InvalidParameter {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> RunConfig {
        RunConfig {
            aoi: vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
            crs: Crs::Projected,
            start_date: "2023-10-01".parse().unwrap(),
            end_date: "2024-03-31".parse().unwrap(),
            max_cloud: default_max_cloud(),
            bands: default_bands(),
            classes: vec![
                ClassDef { name: "Forest".into(), color: "#1b7837".into() },
                ClassDef { name: "Water".into(), color: "#2166ac".into() },
            ],
            training: vec![TrainingRegion {
                landcover: 0,
                vertices: vec![[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]],
            }],
            train_fraction: 0.7,
            trees: 300,
            seed: 42,
            resolution: 1.0,
            max_pixels: default_max_pixels(),
            export_path: PathBuf::from("classified.tif"),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        base_config().validate().unwrap();
    }

    #[test]
    fn test_defaults_from_minimal_json() {
        let json = r##"{
            "aoi": [[78.7, 29.4], [79.0, 29.4], [79.0, 29.7], [78.7, 29.7]],
            "start_date": "2023-10-01",
            "end_date": "2024-03-31",
            "classes": [
                {"name": "Forest", "color": "#1b7837"},
                {"name": "Water", "color": "#2166ac"}
            ],
            "training": [
                {"landcover": 0, "vertices": [[78.75, 29.45], [78.8, 29.45], [78.8, 29.5]]},
                {"landcover": 1, "vertices": [[78.9, 29.6], [78.95, 29.6], [78.95, 29.65]]}
            ],
            "export_path": "out.tif"
        }"##;
        let config: RunConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.crs, Crs::Geographic);
        assert_eq!(config.max_cloud, 10.0);
        assert_eq!(config.train_fraction, 0.7);
        assert_eq!(config.trees, 300);
        assert_eq!(config.max_pixels, 10_000_000_000_000);
        assert_eq!(config.bands, vec!["B2", "B3", "B4", "B8", "B11"]);
    }

    #[test]
    fn test_jim_corbett_config_loads() {
        // The checked-in reference run over the Jim Corbett AOI
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/jim_corbett.json");
        let config = RunConfig::from_file(path).unwrap();

        assert_eq!(config.crs, Crs::Geographic);
        assert_eq!(config.aoi.len(), 4);
        assert_eq!(config.aoi[0], [78.58, 29.62]);
        assert_eq!(config.n_classes(), 4);
        let names: Vec<&str> = config.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Forest", "Grassland", "Water", "Bare Land"]);
        let colors: Vec<&str> = config.classes.iter().map(|c| c.color.as_str()).collect();
        assert_eq!(colors, vec!["#006400", "#7cfc00", "#0000ff", "#deb887"]);

        // Three training polygons per class, in class order
        assert_eq!(config.training.len(), 12);
        let labels: Vec<u8> = config.training.iter().map(|t| t.landcover).collect();
        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);

        assert_eq!(config.max_cloud, 10.0);
        assert_eq!(config.train_fraction, 0.7);
        assert_eq!(config.trees, 300);
        assert_eq!(config.max_pixels, 10_000_000_000_000);
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut c = base_config();
        c.aoi.truncate(2);
        assert!(c.validate().is_err());

        let mut c = base_config();
        c.bands.push("B2".into());
        assert!(c.validate().is_err());

        let mut c = base_config();
        c.bands.retain(|b| b != "B11");
        assert!(c.validate().is_err());

        let mut c = base_config();
        c.classes[0].color = "green".into();
        assert!(c.validate().is_err());

        let mut c = base_config();
        c.train_fraction = 1.0;
        assert!(c.validate().is_err());

        let mut c = base_config();
        c.training[0].landcover = 2;
        assert!(c.validate().is_err());

        let mut c = base_config();
        c.end_date = "2023-01-01".parse().unwrap();
        assert!(c.validate().is_err());

        // Exclusive end: an empty window is rejected
        let mut c = base_config();
        c.end_date = c.start_date;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_aoi_and_training_builders() {
        let config = base_config();
        let aoi = config.aoi().unwrap();
        assert_eq!(aoi.bounding_box(), (0.0, 0.0, 10.0, 10.0));

        let training = config.training_set().unwrap();
        assert_eq!(training.len(), 1);
        assert_eq!(training.classes().into_iter().collect::<Vec<_>>(), vec![0]);
    }
}
