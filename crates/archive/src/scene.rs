//! Scene metadata and query filters.

use chrono::NaiveDate;
use terraclass_core::ImageStack;

/// One archived acquisition: metadata plus its band stack.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Unique scene identifier.
    pub id: String,
    /// Acquisition date.
    pub date: NaiveDate,
    /// Scene-level cloud cover percentage (0-100).
    pub cloud_cover: f64,
    /// Named bands over one shared grid.
    pub bands: ImageStack,
}

impl Scene {
    /// Whether the scene's extent intersects a bounding box.
    pub fn intersects(&self, bbox: (f64, f64, f64, f64)) -> bool {
        let Some(transform) = self.bands.transform() else {
            return false;
        };
        let (rows, cols) = self.bands.shape();
        let (min_x, min_y, max_x, max_y) = transform.bounds(cols, rows);
        let (q_min_x, q_min_y, q_max_x, q_max_y) = bbox;
        min_x <= q_max_x && max_x >= q_min_x && min_y <= q_max_y && max_y >= q_min_y
    }
}

/// Filter for archive queries: spatial extent, date range, cloud cover and
/// required bands.
#[derive(Debug, Clone)]
pub struct SceneQuery {
    /// Bounding box `(min_x, min_y, max_x, max_y)`.
    pub bbox: Option<(f64, f64, f64, f64)>,
    /// Inclusive start date.
    pub start: Option<NaiveDate>,
    /// Exclusive end date.
    pub end: Option<NaiveDate>,
    /// Scenes with cloud cover at or above this threshold are rejected.
    pub max_cloud: Option<f64>,
    /// Bands every matching scene must carry.
    pub bands: Vec<String>,
}

impl SceneQuery {
    pub fn new() -> Self {
        Self {
            bbox: None,
            start: None,
            end: None,
            max_cloud: None,
            bands: Vec::new(),
        }
    }

    /// Restrict to scenes intersecting `(min_x, min_y, max_x, max_y)`.
    pub fn bbox(mut self, bbox: (f64, f64, f64, f64)) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Restrict to the half-open date range `[start, end)`.
    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Reject scenes with cloud cover >= `pct`.
    pub fn max_cloud(mut self, pct: f64) -> Self {
        self.max_cloud = Some(pct);
        self
    }

    /// Require the listed bands.
    pub fn bands<S: Into<String>>(mut self, bands: impl IntoIterator<Item = S>) -> Self {
        self.bands = bands.into_iter().map(Into::into).collect();
        self
    }

    /// Whether one scene passes every filter.
    pub fn matches(&self, scene: &Scene) -> bool {
        if let Some(bbox) = self.bbox {
            if !scene.intersects(bbox) {
                return false;
            }
        }
        if let Some(start) = self.start {
            if scene.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if scene.date >= end {
                return false;
            }
        }
        if let Some(max_cloud) = self.max_cloud {
            if scene.cloud_cover >= max_cloud {
                return false;
            }
        }
        self.bands.iter().all(|b| scene.bands.contains_band(b))
    }
}

impl Default for SceneQuery {
    fn default() -> Self {
        Self::new()
    }
}
