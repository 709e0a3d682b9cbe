use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub kind: String,
    pub category: String,
    pub tags: Vec<String>,
    pub is_private: bool,
    pub is_favorite: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVaultItem {
    pub title: String,
    pub content: String,
    pub kind: String,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_private: Option<bool>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateVaultItem {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_private: Option<bool>,
    pub metadata: Option<serde_json::Value>,
}

impl UpdateVaultItem {
    pub fn has_work(&self) -> bool {
        self.title.is_some() ||
            self.content.is_some() ||
            self.kind.is_some() ||
            self.category.is_some() ||
            self.tags.is_some() ||
            self.is_private.is_some() ||
            self.metadata.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultStats {
    pub total: usize,
    pub by_kind: HashMap<String, usize>,
    pub favorites: usize,
    pub private: usize,
    pub categories: Vec<String>,
    pub recently_added: Vec<VaultItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultExport {
    pub export_date: DateTime<Utc>,
    pub user_id: i64,
    pub item_count: usize,
    pub items: Vec<VaultItem>,
}
