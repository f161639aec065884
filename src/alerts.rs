//! Active-alert retrieval from the point-based advisory feed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::models::{Alert, Coordinate};
use crate::severity::SeverityTier;

/// Capability that returns the active alerts covering a point.
///
/// Re-fetching the same coordinate is safe; every fetch replaces the prior
/// list wholesale.
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn active_alerts(&self, coordinate: Coordinate) -> Result<Vec<Alert>, PipelineError>;
}

/// Wire envelope of the advisory feed: a GeoJSON-style feature collection.
/// Every field is optional on the wire; a missing `features` array parses as
/// an empty one.
#[derive(Debug, Deserialize)]
struct AlertEnvelope {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: AlertProperties,
}

#[derive(Debug, Default, Deserialize)]
struct AlertProperties {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    instruction: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default, rename = "areaDesc")]
    area_desc: Option<String>,
    #[serde(default)]
    sent: Option<String>,
    #[serde(default)]
    effective: Option<String>,
    #[serde(default)]
    expires: Option<String>,
}

/// Parse an advisory-feed response body into alerts, feed order preserved.
///
/// Duplicate ids within one response collapse to a single entry keeping the
/// first occurrence's position and the last occurrence's fields.
pub fn parse_alerts(body: &str) -> Result<Vec<Alert>, PipelineError> {
    let envelope: AlertEnvelope = serde_json::from_str(body)?;

    let mut alerts: Vec<Alert> = Vec::with_capacity(envelope.features.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for feature in envelope.features {
        let alert = alert_from_feature(feature);
        match positions.entry(alert.id.clone()) {
            Entry::Occupied(entry) => {
                debug!(id = %alert.id, "duplicate alert id in response, keeping latest fields");
                alerts[*entry.get()] = alert;
            }
            Entry::Vacant(entry) => {
                entry.insert(alerts.len());
                alerts.push(alert);
            }
        }
    }

    Ok(alerts)
}

fn alert_from_feature(feature: AlertFeature) -> Alert {
    let props = feature.properties;

    // Identity: the record's own id, else the feature id, else a fresh UUID
    // so the entry stays addressable.
    let id = props
        .id
        .or(feature.id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // An absent severity field is routine for some feed products; only an
    // unrecognized string is worth a diagnostic, which classify handles.
    let severity = props
        .severity
        .as_deref()
        .map(SeverityTier::classify)
        .unwrap_or_default();

    Alert {
        id,
        headline: props.headline.unwrap_or_default(),
        event: props.event,
        description: props.description,
        instruction: props.instruction,
        severity,
        area_desc: props.area_desc,
        sent: parse_timestamp(props.sent.as_deref()),
        effective: parse_timestamp(props.effective.as_deref()),
        expires: parse_timestamp(props.expires.as_deref()),
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// HTTP client for the advisory feed's active-alerts endpoint.
pub struct AlertClient {
    client: Client,
    base_url: String,
}

impl AlertClient {
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            client: Client::builder()
                .user_agent(&config.user_agent)
                .timeout(config.timeout())
                .build()?,
            base_url: config.alerts_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AlertSource for AlertClient {
    async fn active_alerts(&self, coordinate: Coordinate) -> Result<Vec<Alert>, PipelineError> {
        let url = format!("{}/alerts/active", self.base_url);

        let body = self
            .client
            .get(&url)
            .query(&[("point", coordinate.point_query())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let alerts = parse_alerts(&body)?;
        debug!(%coordinate, count = alerts.len(), "fetched active alerts");
        Ok(alerts)
    }
}
