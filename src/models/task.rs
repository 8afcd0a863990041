use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Represents a marketplace task as stored in the `tasks` table.
///
/// `status` is an open string; the backend owns the set of values.
/// `client_name` and `worker_name` are only present when the query joins
/// the related profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Profile that posted the task. Null until the task is claimed by a client.
    pub client_id: Option<Uuid>,
    /// Profile doing the work. Null until assigned.
    pub worker_id: Option<Uuid>,
    /// Amount paid to the worker on completion.
    pub payment_amount: f64,
    /// Current status, e.g. `open`, `assigned`, `completed`.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Display name of the client, joined from `profiles`.
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Display name of the worker, joined from `profiles`.
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
}

impl Task {
    pub fn is_assigned(&self) -> bool {
        self.worker_id.is_some()
    }
}
