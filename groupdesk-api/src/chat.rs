use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// a group message has no recipient; a private message carries the peer it
/// was sent to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub sender_username: String,
    pub recipient_id: Option<i64>,
    pub body: String,
    pub sent: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessage {
    pub body: String,
}
