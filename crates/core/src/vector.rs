//! Labeled training geometry
//!
//! Training data is loaded configuration, not code: a list of polygons each
//! carrying one categorical `landcover` class id.

use crate::error::{Error, Result};
use geo_types::{Coord, LineString, Polygon};
use std::collections::BTreeSet;

/// A polygon with one categorical `landcover` attribute.
#[derive(Debug, Clone)]
pub struct TrainingPolygon {
    pub geometry: Polygon<f64>,
    pub landcover: u8,
}

impl TrainingPolygon {
    /// Build from an ordered vertex list (closed implicitly).
    pub fn from_vertices(vertices: &[(f64, f64)], landcover: u8) -> Result<Self> {
        let mut coords: Vec<Coord<f64>> = vertices
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect();
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        if coords.len() < 3 {
            return Err(Error::InvalidParameter {
                name: "training polygon",
                value: format!("{} vertices", coords.len()),
                reason: "a polygon needs at least 3 distinct vertices".into(),
            });
        }
        coords.push(coords[0]);
        Ok(Self {
            geometry: Polygon::new(LineString::new(coords), vec![]),
            landcover,
        })
    }
}

/// Ordered collection of training polygons, merged across classes.
///
/// Polygon order matters: when polygons of different classes overlap, the
/// sampler assigns contested pixels to the earliest polygon.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    polygons: Vec<TrainingPolygon>,
}

impl TrainingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, polygon: TrainingPolygon) {
        self.polygons.push(polygon);
    }

    /// Append all polygons of another set, preserving order.
    pub fn merge(&mut self, other: TrainingSet) {
        self.polygons.extend(other.polygons);
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingPolygon> {
        self.polygons.iter()
    }

    /// Distinct class ids present, ascending.
    pub fn classes(&self) -> BTreeSet<u8> {
        self.polygons.iter().map(|p| p.landcover).collect()
    }

    /// Verify every label is a valid id under the given class count.
    pub fn validate_labels(&self, n_classes: u8) -> Result<()> {
        if self.polygons.is_empty() {
            return Err(Error::InvalidParameter {
                name: "training",
                value: "empty".into(),
                reason: "at least one training polygon is required".into(),
            });
        }
        for p in &self.polygons {
            if p.landcover >= n_classes {
                return Err(Error::InvalidParameter {
                    name: "landcover",
                    value: p.landcover.to_string(),
                    reason: format!("class id must be < {}", n_classes),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<TrainingPolygon> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = TrainingPolygon>>(iter: I) -> Self {
        Self {
            polygons: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(x0: f64, y0: f64, landcover: u8) -> TrainingPolygon {
        TrainingPolygon::from_vertices(
            &[(x0, y0), (x0 + 1.0, y0), (x0 + 1.0, y0 + 1.0), (x0, y0 + 1.0)],
            landcover,
        )
        .unwrap()
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut forest = TrainingSet::new();
        forest.push(poly(0.0, 0.0, 0));
        let mut water = TrainingSet::new();
        water.push(poly(5.0, 5.0, 2));

        forest.merge(water);
        assert_eq!(forest.len(), 2);
        let labels: Vec<u8> = forest.iter().map(|p| p.landcover).collect();
        assert_eq!(labels, vec![0, 2]);
    }

    #[test]
    fn test_classes() {
        let set: TrainingSet =
            [poly(0.0, 0.0, 1), poly(2.0, 0.0, 0), poly(4.0, 0.0, 1)].into_iter().collect();
        let classes: Vec<u8> = set.classes().into_iter().collect();
        assert_eq!(classes, vec![0, 1]);
    }

    #[test]
    fn test_validate_labels() {
        let set: TrainingSet = [poly(0.0, 0.0, 3)].into_iter().collect();
        assert!(set.validate_labels(4).is_ok());
        assert!(set.validate_labels(3).is_err());
        assert!(TrainingSet::new().validate_labels(4).is_err());
    }
}
