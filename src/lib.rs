//! Stormward - a location-driven hazard-advisory pipeline.
//!
//! Given a device coordinate, the pipeline resolves a place name, fetches
//! active weather hazard alerts for that point, classifies each alert into an
//! actionable severity tier, and publishes one atomic snapshot per fetch
//! cycle. Independently, a free-text query resolves candidate points of
//! interest into coordinates and a padded map viewport framing them.
//!
//! The library is network-facing and in-memory only; a consuming presentation
//! layer subscribes to snapshots and renders whatever state is published.

pub mod alerts;
pub mod conditions;
pub mod config;
pub mod error;
pub mod geocode;
pub mod location;
pub mod models;
pub mod photon;
pub mod pipeline;
pub mod poi;
pub mod severity;
pub mod viewport;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use models::{Alert, Coordinate, PlaceName, PoiCandidate, ResolvedPoi};
pub use pipeline::{HazardPipeline, PlaceAlertSnapshot};
pub use poi::{PoiResolver, PoiSnapshot};
pub use severity::SeverityTier;
pub use viewport::{compute_viewport, Viewport};
