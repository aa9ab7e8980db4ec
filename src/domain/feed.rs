use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    /// Creator of the feed
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Scheduling cursor. `None` means never fetched and is polled first.
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl Feed {
    pub fn new(name: String, url: String, user_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            url,
            user_id,
            created_at: now,
            updated_at: now,
            last_fetched_at: None,
        }
    }

    pub fn with_last_fetched_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_fetched_at = at;
        self
    }
}
