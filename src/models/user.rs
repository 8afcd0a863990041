use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// A user record as handed out by the identity provider.
///
/// `user_metadata` is free-form; the marketplace only reads `name` and
/// `experience` from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    pub created_at: Option<DateTime<Utc>>,
}

/// An [`AuthUser`] with `name` and `experience` lifted to the top level.
///
/// Produced by [`crate::utils::format_user_with_metadata`]. Serializes flat,
/// the same shape the frontend reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomUser {
    #[serde(flatten)]
    pub user: AuthUser,
    pub name: String,
    /// Accumulated hours. Never negative.
    pub experience: f64,
}

impl CustomUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub experience: f64,
    /// Balance in the external ledger.
    pub credits: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}
