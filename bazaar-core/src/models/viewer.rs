//! Resolved request identity

use serde::{Deserialize, Serialize};

/// Decoded identity claim of the current request.
///
/// Produced by an external token codec; `role` is the application-level
/// role carried in the claim, not a database role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl Viewer {
    pub fn new(id: i64, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            role: role.into(),
        }
    }
}

/// Viewer id as bound into viewer-relative queries
pub fn viewer_id(viewer: Option<&Viewer>) -> Option<i64> {
    viewer.map(|v| v.id)
}
