//! Photon-backed provider for reverse geocoding and POI search.
//!
//! One client implements both [`ReverseGeocode`] and [`PoiProvider`] so a
//! single instance can back both sides of the pipeline.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::geocode::{Placemark, ReverseGeocode};
use crate::models::{Coordinate, PoiCandidate};
use crate::poi::PoiProvider;

// Photon responses are GeoJSON feature collections.
#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    #[serde(default)]
    properties: PhotonProperties,
    #[serde(default)]
    geometry: PhotonGeometry,
}

#[derive(Debug, Default, Deserialize)]
struct PhotonGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// HTTP client for a Photon geocoding endpoint.
pub struct PhotonClient {
    client: Client,
    base_url: String,
    completion_limit: usize,
}

impl PhotonClient {
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            client: Client::builder()
                .user_agent(&config.user_agent)
                .timeout(config.timeout())
                .build()?,
            base_url: config.photon_url.trim_end_matches('/').to_string(),
            completion_limit: config.completion_limit,
        })
    }

    async fn forward_query(&self, query: &str, limit: usize) -> Result<PhotonResponse, PipelineError> {
        let url = format!("{}/api", self.base_url);
        let body = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("limit", &limit.to_string()),
                ("lang", "en"),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_response(&body)
    }
}

/// Parse a Photon response body; malformed JSON is a parse failure, not a
/// transport one.
fn parse_response(body: &str) -> Result<PhotonResponse, PipelineError> {
    Ok(serde_json::from_str(body)?)
}

/// The candidate's title is the feature's name, falling back to its street;
/// nameless features carry nothing worth listing and are skipped.
fn candidate_from_feature(feature: &PhotonFeature) -> Option<PoiCandidate> {
    let props = &feature.properties;
    let title = props
        .name
        .as_deref()
        .or(props.street.as_deref())
        .filter(|t| !t.is_empty())?;

    let subtitle = [
        props.street.as_deref(),
        props.city.as_deref(),
        props.state.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty() && *part != title)
    .collect::<Vec<_>>()
    .join(", ");

    Some(PoiCandidate::new(title, subtitle))
}

/// GeoJSON geometry carries `[lon, lat]`; anything outside the legal WGS84
/// ranges counts as no match.
fn coordinate_from_feature(feature: &PhotonFeature) -> Option<Coordinate> {
    let coords = &feature.geometry.coordinates;
    if coords.len() < 2 {
        return None;
    }
    let coordinate = Coordinate::new(coords[1], coords[0]);
    if !coordinate.in_bounds() {
        warn!(%coordinate, "discarding out-of-range coordinate from provider");
        return None;
    }
    Some(coordinate)
}

#[async_trait]
impl ReverseGeocode for PhotonClient {
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<Placemark>, PipelineError> {
        let url = format!("{}/reverse", self.base_url);
        let body = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let response = parse_response(&body)?;

        Ok(response.features.into_iter().next().map(|feature| Placemark {
            locality: feature.properties.city,
            region: feature.properties.state,
        }))
    }
}

#[async_trait]
impl PoiProvider for PhotonClient {
    async fn completions(&self, query: &str) -> Result<Vec<PoiCandidate>, PipelineError> {
        let response = self.forward_query(query, self.completion_limit).await?;
        let candidates: Vec<PoiCandidate> = response
            .features
            .iter()
            .filter_map(candidate_from_feature)
            .collect();
        debug!(query, count = candidates.len(), "fetched POI completions");
        Ok(candidates)
    }

    async fn resolve(
        &self,
        candidate: &PoiCandidate,
    ) -> Result<Option<Coordinate>, PipelineError> {
        let response = self.forward_query(&candidate.resolution_query(), 1).await?;
        Ok(response
            .features
            .first()
            .and_then(coordinate_from_feature))
    }
}
