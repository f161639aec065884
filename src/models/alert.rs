//! Hazard alert record from the advisory feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::SeverityTier;

/// A single active hazard advisory at a point.
///
/// Identity is `id`: two alerts with the same id are the same entity even if
/// other fields differ across fetches (last-write-wins on refetch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Stable identifier from the source feed
    pub id: String,
    /// Short summary line; empty when the feed carried none
    pub headline: String,
    /// Event category (e.g., "Flood Watch")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Long-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Recommended action text from the issuing office
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    /// Canonicalized severity tier
    pub severity: SeverityTier,
    /// Affected area description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_desc: Option<String>,
    /// When the alert was sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<DateTime<Utc>>,
    /// When the alert takes effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective: Option<DateTime<Utc>>,
    /// When the alert expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl Alert {
    /// Create an alert with the required fields only
    pub fn new(id: impl Into<String>, headline: impl Into<String>, severity: SeverityTier) -> Self {
        Self {
            id: id.into(),
            headline: headline.into(),
            event: None,
            description: None,
            instruction: None,
            severity,
            area_desc: None,
            sent: None,
            effective: None,
            expires: None,
        }
    }

    /// Fixed evacuation-advisory sentence for this alert's tier
    pub fn recommendation(&self) -> &'static str {
        self.severity.recommendation()
    }
}
