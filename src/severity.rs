//! Severity-tier classification and evacuation recommendations.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Canonicalized urgency level of a hazard alert.
///
/// Declaration order gives the urgency ordering: `Unknown < Minor < Moderate
/// < Severe < Extreme`. The wire carries severity as free text; it is
/// canonicalized once on ingestion via [`SeverityTier::classify`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    #[default]
    Unknown,
    Minor,
    Moderate,
    Severe,
    Extreme,
}

impl SeverityTier {
    /// Canonicalize a raw severity string from the feed.
    ///
    /// The match is exact and case-sensitive against the feed's documented
    /// vocabulary; anything else (empty, unexpected casing, novel categories)
    /// maps to `Unknown`. Unrecognized non-empty strings are logged so feed
    /// drift stays visible.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "Extreme" => SeverityTier::Extreme,
            "Severe" => SeverityTier::Severe,
            "Moderate" => SeverityTier::Moderate,
            "Minor" => SeverityTier::Minor,
            other => {
                if !other.is_empty() {
                    debug!(severity = other, "unrecognized severity string");
                }
                SeverityTier::Unknown
            }
        }
    }

    /// Fixed evacuation-advisory sentence for this tier. Total and pure.
    pub fn recommendation(&self) -> &'static str {
        match self {
            SeverityTier::Extreme => "critically recommended to evacuate immediately",
            SeverityTier::Severe => "strongly recommended to evacuate",
            SeverityTier::Moderate => "stay cautious and ready to evacuate",
            SeverityTier::Minor => "monitor; evacuation not currently required",
            SeverityTier::Unknown => "no evacuation advisory; stay informed",
        }
    }

    /// Canonical display name for this tier
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Extreme => "Extreme",
            SeverityTier::Severe => "Severe",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::Minor => "Minor",
            SeverityTier::Unknown => "Unknown",
        }
    }

    /// All tiers in ascending urgency order
    pub fn all() -> &'static [SeverityTier] {
        &[
            SeverityTier::Unknown,
            SeverityTier::Minor,
            SeverityTier::Moderate,
            SeverityTier::Severe,
            SeverityTier::Extreme,
        ]
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_canonical_vocabulary() {
        assert_eq!(SeverityTier::classify("Extreme"), SeverityTier::Extreme);
        assert_eq!(SeverityTier::classify("Severe"), SeverityTier::Severe);
        assert_eq!(SeverityTier::classify("Moderate"), SeverityTier::Moderate);
        assert_eq!(SeverityTier::classify("Minor"), SeverityTier::Minor);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(SeverityTier::classify("extreme"), SeverityTier::Unknown);
        assert_eq!(SeverityTier::classify("SEVERE"), SeverityTier::Unknown);
        assert_eq!(SeverityTier::classify("moderate"), SeverityTier::Unknown);
    }

    #[test]
    fn test_classify_is_total() {
        for raw in ["", "Catastrophic", "severe ", " Minor", "42", "\u{fffd}"] {
            assert_eq!(SeverityTier::classify(raw), SeverityTier::Unknown);
        }
    }

    #[test]
    fn test_ordering_governs_urgency() {
        assert!(SeverityTier::Extreme > SeverityTier::Severe);
        assert!(SeverityTier::Severe > SeverityTier::Moderate);
        assert!(SeverityTier::Moderate > SeverityTier::Minor);
        assert!(SeverityTier::Minor > SeverityTier::Unknown);
    }

    #[test]
    fn test_recommendation_is_total_and_stable() {
        for tier in SeverityTier::all() {
            assert!(!tier.recommendation().is_empty());
            assert_eq!(tier.recommendation(), tier.recommendation());
        }
        assert_eq!(
            SeverityTier::Extreme.recommendation(),
            "critically recommended to evacuate immediately"
        );
        assert_eq!(
            SeverityTier::Severe.recommendation(),
            "strongly recommended to evacuate"
        );
        assert_eq!(
            SeverityTier::Moderate.recommendation(),
            "stay cautious and ready to evacuate"
        );
        assert_eq!(
            SeverityTier::Minor.recommendation(),
            "monitor; evacuation not currently required"
        );
        assert_eq!(
            SeverityTier::Unknown.recommendation(),
            "no evacuation advisory; stay informed"
        );
    }

    #[test]
    fn test_label_round_trips_through_classify() {
        for tier in SeverityTier::all() {
            if *tier != SeverityTier::Unknown {
                assert_eq!(SeverityTier::classify(tier.label()), *tier);
            }
        }
    }
}
