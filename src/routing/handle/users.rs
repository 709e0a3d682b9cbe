use axum::http::StatusCode;
use axum::extract::State;
use axum::response::IntoResponse;
use futures::TryStreamExt;

use groupdesk_api::Payload;
use groupdesk_api::users::{CreateUser, Role, User};
use groupdesk_lib::validation;

use crate::activity;
use crate::net::error::{self, GeneralKind, UserKind};
use crate::sec::authn::{password, Initiator};
use crate::sql::{self, unique_constraint_error};
use crate::state::ArcShared;

pub mod user_id;

pub async fn get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let params: sql::ParamsVec = vec![];

    let result = conn.query_raw(
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
        order by users.username",
        params
    ).await?;

    futures::pin_mut!(result);

    let mut list = Vec::new();

    while let Some(row) = result.try_next().await? {
        list.push(User {
            id: row.get(0),
            username: row.get(1),
            email: row.get(2),
            first_name: row.get(3),
            last_name: row.get(4),
            role: row.get::<usize, String>(5).parse().map_err(|_| {
                error::Error::new().context("invalid role stored for user")
            })?,
            is_active: row.get(6),
            created: row.get(7),
            last_login: row.get(8),
        });
    }

    Ok(Payload::new(list))
}

pub async fn post(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<CreateUser>,
) -> error::Result<impl IntoResponse> {
    initiator.require_manager()?;

    let conn = state.pool().get().await?;

    if !validation::username_valid(&json.username) {
        return Err(error::Error::api((
            GeneralKind::ValidationFailed,
            "invalid username"
        )));
    }

    if json.password.is_empty() {
        return Err(error::Error::api((
            GeneralKind::ValidationFailed,
            "password cannot be empty"
        )));
    }

    let role = json.role.unwrap_or(Role::Member);
    let hash = password::gen_hash(&json.password)?;

    let result = conn.query_one(
        "\
        insert into users (username, email, first_name, last_name, password, role) values \
        ($1, $2, $3, $4, $5, $6) \
        returning id, created",
        &[
            &json.username,
            &json.email,
            &json.first_name,
            &json.last_name,
            &hash,
            &role.as_ref(),
        ]
    ).await;

    let row = match result {
        Ok(row) => row,
        Err(err) => {
            if unique_constraint_error(&err).is_some() {
                return Err(error::Error::api((
                    UserKind::AlreadyExists,
                    "username or email is already taken"
                )));
            }

            return Err(err.into());
        }
    };

    activity::record(
        &conn,
        Some(initiator.user.id),
        "user_created",
        &json.username
    ).await;

    Ok((
        StatusCode::CREATED,
        Payload::new(User {
            id: row.get(0),
            username: json.username,
            email: json.email,
            first_name: json.first_name,
            last_name: json.last_name,
            role,
            is_active: true,
            created: row.get(1),
            last_login: None,
        })
    ))
}
