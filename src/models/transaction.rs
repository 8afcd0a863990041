use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A ledger entry from the `transactions` table.
///
/// `type` and `status` are left as strings because the external schema does
/// not constrain them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Option<Uuid>,
    pub amount: f64,
    pub credits: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub transaction_type: String,
    pub status: String,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Looks up a key in the metadata mapping, if there is one.
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref()?.as_object()?.get(key)
    }
}
