use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStats {
    pub total_members: i64,
    pub active_members: i64,
    pub managers: i64,
    pub members: i64,
}

/// one row of the activity feed. `user_id` and `username` are absent when
/// the acting account has since been removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub action: String,
    pub detail: String,
    pub logged: DateTime<Utc>,
}
