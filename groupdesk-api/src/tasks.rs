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
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    StrumAsRefStr, StrumEnumString,
    Serialize, Deserialize
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub project_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub created_by: i64,
    pub created: DateTime<Utc>,
    pub due: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub due: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
}

impl UpdateTask {
    pub fn has_work(&self) -> bool {
        self.title.is_some() ||
            self.description.is_some() ||
            self.status.is_some() ||
            self.priority.is_some() ||
            self.project_id.is_some() ||
            self.assigned_to.is_some() ||
            self.due.is_some() ||
            self.completed.is_some()
    }
}
