use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

pub use groupdesk_lib::fs::{VirtualPath, FileId};

use crate::error::ApiError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    Serialize, Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Folder => f.write_str("folder"),
        }
    }
}

/// a single file or folder as seen by the client.
///
/// the id is the reversible encoding of the virtual path; renaming or moving
/// an entry changes its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub path: VirtualPath,
    pub parent_path: VirtualPath,
    pub extension: Option<String>,
    pub mime: String,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub created_by: String,
    pub modified_by: String,
    pub is_shared: bool,
    pub is_starred: bool,
    pub tags: Vec<String>,
    pub version: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileListing {
    pub path: VirtualPath,
    pub total_items: usize,
    pub files: Vec<FileEntry>,
}

/// point in time snapshot of the configured storage root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    pub connected: bool,
    pub total_space: u64,
    pub used_space: u64,
    pub server_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFolder {
    pub name: String,
    pub path: Option<String>,
}

/// outcome of one file in an upload batch.
///
/// the filesystem write and the metadata record are independent effects, so
/// a saved file reports whether its metadata row also landed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadResult {
    Saved {
        entry: FileEntry,
        metadata_recorded: bool,
    },
    Failed {
        name: String,
        error: ApiError,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub path: VirtualPath,
    pub uploaded: Vec<UploadResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<FileEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveEntry {
    pub source: FileId,
    pub destination: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenameEntry {
    pub new_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewLocation {
    pub path: VirtualPath,
}
