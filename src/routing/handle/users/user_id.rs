use axum::extract::{Path, State};
use axum::response::IntoResponse;

use groupdesk_api::Payload;
use groupdesk_api::users::{UpdateUser, User};

use crate::activity;
use crate::net::error::{self, GeneralKind, UserKind};
use crate::sec::authn::Initiator;
use crate::sql::{self, push_param, write_set};
use crate::state::ArcShared;
use crate::user;

pub async fn get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(user_id): Path<i64>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let Some(found) = user::User::query_with_id(&conn, &user_id).await? else {
        return Err(error::Error::api(UserKind::NotFound));
    };

    let rtn: User = found.into();

    Ok(Payload::new(rtn))
}

pub async fn patch(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(user_id): Path<i64>,
    axum::Json(json): axum::Json<UpdateUser>,
) -> error::Result<impl IntoResponse> {
    initiator.require_manager()?;

    let conn = state.pool().get().await?;

    if !json.has_work() {
        return Err(error::Error::api((
            GeneralKind::NoWork,
            "no changes were given"
        )));
    }

    if json.role.is_some() && user_id == initiator.user.id {
        return Err(error::Error::api((
            UserKind::SelfRoleChange,
            "cannot change your own role"
        )));
    }

    let Some(_found) = user::User::query_with_id(&conn, &user_id).await? else {
        return Err(error::Error::api(UserKind::NotFound));
    };

    let mut update_query = String::from("update users set");
    let mut params: sql::ParamsVec = vec![&user_id];

    let role_str = json.role.map(|role| role.as_ref().to_owned());

    if let Some(email) = &json.email {
        write_set(&mut update_query, "email", push_param(&mut params, email));
    }

    if let Some(first_name) = &json.first_name {
        write_set(&mut update_query, "first_name", push_param(&mut params, first_name));
    }

    if let Some(last_name) = &json.last_name {
        write_set(&mut update_query, "last_name", push_param(&mut params, last_name));
    }

    if let Some(role) = &role_str {
        write_set(&mut update_query, "role", push_param(&mut params, role));
    }

    if let Some(is_active) = &json.is_active {
        write_set(&mut update_query, "is_active", push_param(&mut params, is_active));
    }

    update_query.push_str(" where id = $1");

    conn.execute(update_query.as_str(), params.as_slice()).await?;

    let updated = user::User::query_with_id(&conn, &user_id).await?
        .ok_or_else(|| error::Error::api(UserKind::NotFound))?;

    activity::record(
        &conn,
        Some(initiator.user.id),
        "user_updated",
        &updated.username
    ).await;

    let rtn: User = updated.into();

    Ok(Payload::new(rtn))
}

pub async fn delete(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(user_id): Path<i64>,
) -> error::Result<impl IntoResponse> {
    initiator.require_manager()?;

    if user_id == initiator.user.id {
        return Err(error::Error::api((
            UserKind::SelfDelete,
            "cannot delete your own account"
        )));
    }

    let mut conn = state.pool().get().await?;

    let Some(found) = user::User::query_with_id(&conn, &user_id).await? else {
        return Err(error::Error::api(UserKind::NotFound));
    };

    // every table referencing users (id) is unlinked or cleared before the
    // account row goes, otherwise the final delete trips a foreign key
    let transaction = conn.transaction().await?;

    transaction.execute(
        "delete from auth_session where user_id = $1",
        &[&user_id]
    ).await?;

    // history keeps its rows without an author
    transaction.execute(
        "update activity_log set user_id = null where user_id = $1",
        &[&user_id]
    ).await?;
    transaction.execute(
        "update tasks set assigned_to = null where assigned_to = $1",
        &[&user_id]
    ).await?;

    // authored rows pass to the manager removing the account
    transaction.execute(
        "update tasks set created_by = $2 where created_by = $1",
        &[&user_id, &initiator.user.id]
    ).await?;
    transaction.execute(
        "update projects set created_by = $2 where created_by = $1",
        &[&user_id, &initiator.user.id]
    ).await?;

    // personal data goes with the account
    transaction.execute(
        "delete from chat_message where sender_id = $1 or recipient_id = $1",
        &[&user_id]
    ).await?;
    transaction.execute(
        "delete from vault_item where user_id = $1",
        &[&user_id]
    ).await?;

    transaction.execute(
        "delete from users where id = $1",
        &[&user_id]
    ).await?;

    transaction.commit().await?;

    activity::record(
        &conn,
        Some(initiator.user.id),
        "user_deleted",
        &found.username
    ).await;

    Ok(Payload::new(()))
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    // tables the delete transaction above unlinks or clears. a new table
    // gaining a users (id) reference must be added both there and here
    const UNLINKED_TABLES: &[&str] = &[
        "auth_session",
        "activity_log",
        "tasks",
        "projects",
        "chat_message",
        "vault_item",
    ];

    #[test]
    fn delete_covers_every_table_referencing_users() {
        let schema = include_str!("../../../../db/setup/postgres/tables.sql");

        let mut current = "";
        let mut referencing = BTreeSet::new();

        for line in schema.lines() {
            let trimmed = line.trim();

            if let Some(rest) = trimmed.strip_prefix("create table ") {
                current = rest.split_whitespace().next().unwrap_or("");
            } else if trimmed.contains("references users") {
                referencing.insert(current);
            }
        }

        let handled: BTreeSet<&str> = UNLINKED_TABLES.iter().copied().collect();

        assert_eq!(referencing, handled);
    }
}
