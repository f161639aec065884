//! Map viewport computation over a set of resolved coordinates.

use geo::BoundingRect;
use geo_types::{MultiPoint, Point};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::models::Coordinate;

/// Padding multiplier applied to both spans so every point stays visible
/// with margin.
const SPAN_PADDING: f64 = 1.5;

/// Centered, padded bounding region framing a set of points.
///
/// Derived data; recomputed whenever the resolved POI set changes. A single
/// point yields zero spans in both axes; imposing a minimum viewable span is
/// the renderer's job, not the calculator's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub span_lat: f64,
    pub span_lon: f64,
}

/// Compute the viewport framing `points`.
///
/// Errors with [`PipelineError::EmptyInput`] on an empty slice; callers must
/// check non-emptiness first.
pub fn compute_viewport(points: &[Coordinate]) -> Result<Viewport, PipelineError> {
    let multi: MultiPoint<f64> = points.iter().copied().map(Point::from).collect();
    let rect = multi.bounding_rect().ok_or(PipelineError::EmptyInput)?;

    let center = rect.center();
    Ok(Viewport {
        center: Coordinate::new(center.y, center.x),
        span_lat: rect.height() * SPAN_PADDING,
        span_lon: rect.width() * SPAN_PADDING,
    })
}
