use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use strum::{AsRefStr as StrumAsRefStr, EnumString as StrumEnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    StrumAsRefStr, StrumEnumString,
    Serialize, Deserialize
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Manager,
    Member,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    pub fn has_work(&self) -> bool {
        self.email.is_some() ||
            self.first_name.is_some() ||
            self.last_name.is_some() ||
            self.role.is_some() ||
            self.is_active.is_some()
    }
}
