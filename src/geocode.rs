//! Reverse geocoding: coordinate to place name.

use async_trait::async_trait;
use tracing::warn;

use crate::error::PipelineError;
use crate::models::{place, Coordinate, PlaceName};

/// Raw result of one reverse-geocode lookup. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placemark {
    pub locality: Option<String>,
    pub region: Option<String>,
}

/// Capability that turns a coordinate into a placemark.
///
/// Single request/response, single attempt, no retry. The pipeline imposes
/// no timeout of its own; the provider's transport timeout bounds the call.
#[async_trait]
pub trait ReverseGeocode: Send + Sync {
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<Placemark>, PipelineError>;
}

/// Resolve a coordinate into a displayable place name.
///
/// Provider failure or an empty result yields the "Error" sentinel pair and
/// logs the cause; a placemark with missing fields falls back to "Unknown"
/// per field rather than failing.
pub async fn resolve_place_name<G>(provider: &G, coordinate: Coordinate) -> PlaceName
where
    G: ReverseGeocode + ?Sized,
{
    match provider.reverse_geocode(coordinate).await {
        Ok(Some(placemark)) => PlaceName::new(
            field_or_unknown(placemark.locality),
            field_or_unknown(placemark.region),
        ),
        Ok(None) => {
            warn!(%coordinate, "reverse geocode returned no placemark");
            PlaceName::error()
        }
        Err(e) => {
            warn!(%coordinate, error = %e, "reverse geocode failed");
            PlaceName::error()
        }
    }
}

fn field_or_unknown(field: Option<String>) -> String {
    match field {
        Some(value) if !value.is_empty() => value,
        _ => place::UNKNOWN.to_string(),
    }
}
