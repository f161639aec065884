//! Geographic primitives shared across the pipeline.

use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Geographic coordinate (WGS84 lat/lon). Immutable value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether the coordinate lies inside the legal WGS84 ranges
    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Render as the `lat,lon` pair used by point-based feed queries.
    ///
    /// The advisory service rejects points with more than four decimal
    /// places, so the pair is rounded accordingly.
    pub fn point_query(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(value: Point<f64>) -> Self {
        Self {
            latitude: value.y(),
            longitude: value.x(),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}
