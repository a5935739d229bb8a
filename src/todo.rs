use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item.
///
/// `id` and both timestamps are assigned by the persistence layer and never
/// by clients; `text` is immutable after creation (there is no edit
/// operation); `completed` flips only through the toggle operation.
///
/// Wire shape (JSON, camelCase):
/// `{ id, text, completed, createdAt, updatedAt }` with RFC 3339 timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a fresh record: v4 id, not completed, both timestamps from a
    /// single clock reading so `created_at == updated_at` at birth.
    pub fn new(text: &str) -> Todo {
        let now = Utc::now();
        Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
