//! Session and identity claims
//!
//! Coordinators receive an explicit [`Session`] rather than reading
//! ambient credential state. The claims are taken as decoded by the
//! identity provider; only expiry and role are checked locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role claim decoded from the bearer credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Admin,
}

/// Decoded session claims plus the raw bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Subject the credential was issued for (student or admin id)
    pub subject_id: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    /// Raw bearer token forwarded on every service call
    pub token: String,
}

impl Session {
    pub fn new(
        subject_id: impl Into<String>,
        role: Role,
        expires_at: DateTime<Utc>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            role,
            expires_at,
            token: token.into(),
        }
    }

    /// Whether the credential has expired as of now
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
