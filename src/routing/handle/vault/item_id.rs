use axum::extract::{Path, State};
use axum::response::IntoResponse;

use groupdesk_api::Payload;
use groupdesk_api::vault::{UpdateVaultItem, VaultItem};
use groupdesk_lib::validation;

use crate::net::error::{self, GeneralKind, VaultKind};
use crate::sec::authn::Initiator;
use crate::sql::{self, push_param, write_set};
use crate::state::ArcShared;

use super::{item_from_row, ITEM_COLUMNS};

async fn query_item(
    conn: &deadpool_postgres::Object,
    user_id: &i64,
    item_id: &str,
) -> error::Result<Option<VaultItem>> {
    let query = format!(
        "\
        select {ITEM_COLUMNS} \
        from vault_item \
        where vault_item.id = $1 and \
              vault_item.user_id = $2"
    );

    let maybe = conn.query_opt(query.as_str(), &[&item_id, user_id]).await?;

    Ok(maybe.as_ref().map(item_from_row))
}

pub async fn get(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(item_id): Path<String>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let Some(found) = query_item(&conn, &initiator.user.id, &item_id).await? else {
        return Err(error::Error::api(VaultKind::NotFound));
    };

    Ok(Payload::new(found))
}

pub async fn patch(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(item_id): Path<String>,
    axum::Json(json): axum::Json<UpdateVaultItem>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if !json.has_work() {
        return Err(error::Error::api((
            GeneralKind::NoWork,
            "no changes were given"
        )));
    }

    if let Some(title) = &json.title {
        if !validation::title_valid(title) {
            return Err(error::Error::api((
                GeneralKind::ValidationFailed,
                "invalid item title"
            )));
        }
    }

    if query_item(&conn, &initiator.user.id, &item_id).await?.is_none() {
        return Err(error::Error::api(VaultKind::NotFound));
    }

    let mut update_query = String::from("update vault_item set updated = now()");
    let mut params: sql::ParamsVec = vec![&item_id, &initiator.user.id];

    if let Some(title) = &json.title {
        write_set(&mut update_query, "title", push_param(&mut params, title));
    }

    if let Some(content) = &json.content {
        write_set(&mut update_query, "content", push_param(&mut params, content));
    }

    if let Some(kind) = &json.kind {
        write_set(&mut update_query, "kind", push_param(&mut params, kind));
    }

    if let Some(category) = &json.category {
        write_set(&mut update_query, "category", push_param(&mut params, category));
    }

    if let Some(tags) = &json.tags {
        write_set(&mut update_query, "tags", push_param(&mut params, tags));
    }

    if let Some(is_private) = &json.is_private {
        write_set(&mut update_query, "is_private", push_param(&mut params, is_private));
    }

    if let Some(metadata) = &json.metadata {
        write_set(&mut update_query, "metadata", push_param(&mut params, metadata));
    }

    update_query.push_str(" where id = $1 and user_id = $2");

    conn.execute(update_query.as_str(), params.as_slice()).await?;

    let updated = query_item(&conn, &initiator.user.id, &item_id).await?
        .ok_or_else(|| error::Error::new().context("vault item disappeared during update"))?;

    Ok(Payload::new(updated))
}

pub async fn delete(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(item_id): Path<String>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let count = conn.execute(
        "delete from vault_item where id = $1 and user_id = $2",
        &[&item_id, &initiator.user.id]
    ).await?;

    if count != 1 {
        return Err(error::Error::api(VaultKind::NotFound));
    }

    Ok(Payload::new(()))
}

pub async fn favorite(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(item_id): Path<String>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let query = format!(
        "\
        update vault_item \
        set is_favorite = not is_favorite, \
            updated = now() \
        where id = $1 and user_id = $2 \
        returning {ITEM_COLUMNS}"
    );

    let Some(row) = conn.query_opt(
        query.as_str(),
        &[&item_id, &initiator.user.id]
    ).await? else {
        return Err(error::Error::api(VaultKind::NotFound));
    };

    Ok(Payload::new(item_from_row(&row)))
}
