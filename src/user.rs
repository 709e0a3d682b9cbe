use std::str::FromStr;

use chrono::{DateTime, Utc};
use tokio_postgres::Error as PgError;
use deadpool_postgres::GenericClient;

use groupdesk_api::users::Role;

#[derive(Debug, Clone)]
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

fn role_from_sql(value: &str) -> Role {
    Role::from_str(value)
        .expect("invalid role returned from database for user")
}

impl User {
    fn from_row(row: &tokio_postgres::Row) -> Self {
        User {
            id: row.get(0),
            username: row.get(1),
            email: row.get(2),
            first_name: row.get(3),
            last_name: row.get(4),
            role: role_from_sql(row.get(5)),
            is_active: row.get(6),
            created: row.get(7),
            last_login: row.get(8),
        }
    }

    pub async fn query_with_id(
        conn: &impl GenericClient,
        id: &i64
    ) -> Result<Option<Self>, PgError> {
        Ok(conn.query_opt(
            "\
            select users.id, \
                   users.username, \
                   users.email, \
                   users.first_name, \
                   users.last_name, \
                   users.role, \
                   users.is_active, \
                   users.created, \
                   users.last_login \
            from users \
            where users.id = $1",
            &[id]
        ).await?.as_ref().map(Self::from_row))
    }

    pub async fn query_with_username(
        conn: &impl GenericClient,
        username: &str
    ) -> Result<Option<Self>, PgError> {
        Ok(conn.query_opt(
            "\
            select users.id, \
                   users.username, \
                   users.email, \
                   users.first_name, \
                   users.last_name, \
                   users.role, \
                   users.is_active, \
                   users.created, \
                   users.last_login \
            from users \
            where users.username = $1",
            &[&username]
        ).await?.as_ref().map(Self::from_row))
    }

    pub async fn record_login(&self, conn: &impl GenericClient) -> Result<(), PgError> {
        let _ = conn.execute(
            "update users set last_login = now() where id = $1",
            &[&self.id]
        ).await?;

        Ok(())
    }
}

impl From<User> for groupdesk_api::users::User {
    fn from(user: User) -> Self {
        groupdesk_api::users::User {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_active: user.is_active,
            created: user.created,
            last_login: user.last_login,
        }
    }
}
