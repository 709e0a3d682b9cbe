use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use strum::{AsRefStr as StrumAsRefStr, EnumString as StrumEnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    StrumAsRefStr, StrumEnumString,
    Serialize, Deserialize
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProjectStatus {
    Active,
    Completed,
    OnHold,
    Cancelled,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub progress: i32,
    pub created_by: i64,
    pub created: DateTime<Utc>,
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
    pub due: Option<DateTime<Utc>>,
}

impl UpdateProject {
    pub fn has_work(&self) -> bool {
        self.name.is_some() ||
            self.description.is_some() ||
            self.status.is_some() ||
            self.progress.is_some() ||
            self.due.is_some()
    }
}
