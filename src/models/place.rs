//! Resolved place name for a coordinate.

use serde::{Deserialize, Serialize};

/// Sentinel used when a field resolved but carried no data.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel used when resolution failed outright.
pub const ERROR: &str = "Error";

/// Human-readable place name produced by reverse geocoding.
///
/// Fields are never empty strings: a field the provider could not fill is
/// `"Unknown"`, and a failed resolution yields `"Error"` for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceName {
    /// City / town / village
    pub locality: String,
    /// State / province (administrative area)
    pub region: String,
}

impl PlaceName {
    pub fn new(locality: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            region: region.into(),
        }
    }

    /// Place name for a coordinate that has not resolved yet.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    /// Place name for a failed resolution.
    pub fn error() -> Self {
        Self::new(ERROR, ERROR)
    }

    /// Whether this is the failed-resolution sentinel
    pub fn is_error(&self) -> bool {
        self.locality == ERROR && self.region == ERROR
    }
}

impl Default for PlaceName {
    fn default() -> Self {
        Self::unknown()
    }
}

impl std::fmt::Display for PlaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.locality, self.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(PlaceName::unknown().locality, "Unknown");
        assert_eq!(PlaceName::error().region, "Error");
        assert!(PlaceName::error().is_error());
        assert!(!PlaceName::unknown().is_error());
    }

    #[test]
    fn test_display() {
        let place = PlaceName::new("New York", "NY");
        assert_eq!(place.to_string(), "New York, NY");
    }
}
