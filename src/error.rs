//! Error taxonomy of the pipeline.

use thiserror::Error;

use crate::location::PermissionStatus;

/// Failures the pipeline and its providers can report.
///
/// Transport and parse failures during a fetch cycle are recovered locally
/// into a degraded-but-valid snapshot; they never reach a consumer as a
/// fault. `EmptyInput` marks a caller contract violation and is not expected
/// in normal operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network, DNS, timeout or HTTP-status failure
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Malformed response body
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Location access blocked; requires user action, never retried
    #[error("location access {0}; enable location access in system settings")]
    Permission(PermissionStatus),

    /// Geocode or POI lookup returned no match
    #[error("no match found for \"{query}\"")]
    NotFound { query: String },

    /// Viewport computed over zero points
    #[error("cannot compute a viewport over zero points")]
    EmptyInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_message_names_the_state() {
        let err = PipelineError::Permission(PermissionStatus::Denied);
        let message = err.to_string();
        assert!(message.contains("denied"));
        assert!(message.contains("enable location access"));
    }

    #[test]
    fn test_not_found_carries_the_query() {
        let err = PipelineError::NotFound {
            query: "Hotels".into(),
        };
        assert!(err.to_string().contains("Hotels"));
    }
}
