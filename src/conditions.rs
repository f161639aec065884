//! Current weather conditions, an optional enrichment of the hazard snapshot.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::models::Coordinate;

/// Current observed conditions at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Fahrenheit
    pub temp_f: f64,
    /// Condition text, e.g. "Partly cloudy"
    pub condition: String,
    /// Wind speed in mph
    pub wind_mph: f64,
    /// Compass wind direction, e.g. "NW"
    pub wind_dir: String,
}

/// Capability that returns current conditions for a point.
#[async_trait]
pub trait ConditionsSource: Send + Sync {
    async fn current(&self, coordinate: Coordinate) -> Result<CurrentConditions, PipelineError>;
}

#[derive(Debug, Deserialize)]
struct ConditionsEnvelope {
    current: WireCurrent,
}

#[derive(Debug, Deserialize)]
struct WireCurrent {
    temp_f: f64,
    condition: WireCondition,
    wind_mph: f64,
    wind_dir: String,
}

#[derive(Debug, Deserialize)]
struct WireCondition {
    text: String,
}

/// HTTP client for a keyed current-weather API.
pub struct ConditionsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ConditionsClient {
    /// Returns `None` when no API key is configured; the pipeline then
    /// carries no conditions and skips the call entirely.
    pub fn from_config(config: &PipelineConfig) -> Result<Option<Self>, PipelineError> {
        let Some(api_key) = config.conditions_api_key.clone() else {
            return Ok(None);
        };
        Ok(Some(Self {
            client: Client::builder()
                .user_agent(&config.user_agent)
                .timeout(config.timeout())
                .build()?,
            base_url: config.conditions_url.trim_end_matches('/').to_string(),
            api_key,
        }))
    }
}

/// Parse a current-conditions response body.
fn parse_conditions(body: &str) -> Result<CurrentConditions, PipelineError> {
    let envelope: ConditionsEnvelope = serde_json::from_str(body)?;
    Ok(CurrentConditions {
        temp_f: envelope.current.temp_f,
        condition: envelope.current.condition.text,
        wind_mph: envelope.current.wind_mph,
        wind_dir: envelope.current.wind_dir,
    })
}

#[async_trait]
impl ConditionsSource for ConditionsClient {
    async fn current(&self, coordinate: Coordinate) -> Result<CurrentConditions, PipelineError> {
        let url = format!("{}/v1/current.json", self.base_url);

        let body = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", &coordinate.point_query()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let current = parse_conditions(&body)?;
        debug!(%coordinate, temp_f = current.temp_f, "fetched current conditions");
        Ok(current)
    }
}
