//! Core data models for the hazard-advisory pipeline.

pub mod alert;
pub mod geo;
pub mod place;
pub mod poi;

pub use alert::Alert;
pub use geo::Coordinate;
pub use place::PlaceName;
pub use poi::{PoiCandidate, ResolvedPoi};
