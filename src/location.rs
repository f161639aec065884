//! Contract consumed from the platform location capability.

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

/// Authorization state of the location capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    NotDetermined,
    Restricted,
    Denied,
    Authorized,
}

impl PermissionStatus {
    /// Whether this state blocks location delivery and requires user action
    pub fn is_blocked(&self) -> bool {
        matches!(self, PermissionStatus::Denied | PermissionStatus::Restricted)
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            PermissionStatus::NotDetermined => "not determined",
            PermissionStatus::Restricted => "restricted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Authorized => "authorized",
        };
        f.write_str(text)
    }
}


/// One event from the location capability's update stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationUpdate {
    /// A fresh device coordinate
    Position(Coordinate),
    /// A permission-state transition
    Permission(PermissionStatus),
}
