//! Area of interest
//!
//! The closed polygon bounding every spatial operation in a run: imagery
//! queries, clipping, classification and area reporting.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster};
use geo::{Area, BoundingRect, Contains};
use geo_types::{Coord, LineString, Point, Polygon};

/// A closed polygon bounding all spatial queries and exports.
///
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct AreaOfInterest {
    polygon: Polygon<f64>,
}

impl AreaOfInterest {
    /// Build from an ordered list of (x, y) vertices. The ring is closed
    /// implicitly; at least 3 distinct vertices are required.
    pub fn from_vertices(vertices: &[(f64, f64)]) -> Result<Self> {
        let mut coords: Vec<Coord<f64>> = vertices
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect();
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        if coords.len() < 3 {
            return Err(Error::InvalidParameter {
                name: "aoi",
                value: format!("{} vertices", coords.len()),
                reason: "a polygon needs at least 3 distinct vertices".into(),
            });
        }
        coords.push(coords[0]);
        Ok(Self {
            polygon: Polygon::new(LineString::new(coords), vec![]),
        })
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Bounding box as (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        // A polygon with >= 3 vertices always has a bounding rect.
        let rect = self.polygon.bounding_rect().expect("non-empty polygon");
        (rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// Whether a point lies inside the polygon.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygon.contains(&Point::new(x, y))
    }

    /// Planar polygon area in CRS units squared.
    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    /// Build a north-up grid covering the bounding box at the given cell
    /// size, returning (transform, rows, cols).
    pub fn grid(&self, cell_size: f64) -> Result<(GeoTransform, usize, usize)> {
        if !(cell_size > 0.0) {
            return Err(Error::InvalidParameter {
                name: "cell_size",
                value: cell_size.to_string(),
                reason: "must be positive".into(),
            });
        }
        let (min_x, min_y, max_x, max_y) = self.bounding_box();
        let cols = ((max_x - min_x) / cell_size).ceil().max(1.0) as usize;
        let rows = ((max_y - min_y) / cell_size).ceil().max(1.0) as usize;
        let transform = GeoTransform::new(min_x, max_y, cell_size, -cell_size);
        Ok((transform, rows, cols))
    }

    /// Rasterize the polygon onto a grid: 1 where the pixel center falls
    /// inside, 0 elsewhere.
    pub fn mask(&self, transform: &GeoTransform, rows: usize, cols: usize) -> Raster<u8> {
        let mut mask: Raster<u8> = Raster::new(rows, cols);
        mask.set_transform(*transform);
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = transform.pixel_to_geo(col, row);
                if self.contains(x, y) {
                    mask.data_mut()[(row, col)] = 1;
                }
            }
        }
        mask
    }
}
