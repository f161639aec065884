//! Point-of-interest candidates and resolved annotations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Coordinate;

/// Raw completion from a free-text search, not yet geocoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiCandidate {
    pub title: String,
    /// Disambiguating context (street, city, ...); may be empty
    pub subtitle: String,
}

impl PoiCandidate {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// The lookup key a resolution request is issued for: title plus subtitle
    pub fn resolution_query(&self) -> String {
        if self.subtitle.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.subtitle)
        }
    }
}

/// A candidate that resolved to a coordinate.
///
/// Created only after a successful resolution; candidates that fail
/// resolution never produce one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPoi {
    /// Opaque identity, fresh per resolution batch
    pub id: Uuid,
    pub title: String,
    pub coordinate: Coordinate,
}

impl ResolvedPoi {
    pub fn new(title: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            coordinate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_query_joins_title_and_subtitle() {
        let candidate = PoiCandidate::new("Grand Hotel", "Broadway, New York");
        assert_eq!(candidate.resolution_query(), "Grand Hotel Broadway, New York");
    }

    #[test]
    fn test_resolution_query_without_subtitle() {
        let candidate = PoiCandidate::new("Grand Hotel", "");
        assert_eq!(candidate.resolution_query(), "Grand Hotel");
    }
}
