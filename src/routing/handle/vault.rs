use std::collections::HashMap;

use axum::http::StatusCode;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;

use groupdesk_api::Payload;
use groupdesk_api::vault::{CreateVaultItem, VaultExport, VaultItem, VaultStats};
use groupdesk_lib::validation;

use crate::net::error::{self, GeneralKind};
use crate::sec::authn::Initiator;
use crate::sql::{self, push_param};
use crate::state::ArcShared;

pub mod item_id;

pub const DEFAULT_CATEGORY: &str = "general";

pub const ITEM_COLUMNS: &str = "\
    vault_item.id, \
    vault_item.title, \
    vault_item.content, \
    vault_item.kind, \
    vault_item.category, \
    vault_item.tags, \
    vault_item.is_private, \
    vault_item.is_favorite, \
    vault_item.created, \
    vault_item.updated, \
    vault_item.metadata";

pub fn item_from_row(row: &tokio_postgres::Row) -> VaultItem {
    VaultItem {
        id: row.get(0),
        title: row.get(1),
        content: row.get(2),
        kind: row.get(3),
        category: row.get(4),
        tags: row.get(5),
        is_private: row.get(6),
        is_favorite: row.get(7),
        created: row.get(8),
        updated: row.get(9),
        metadata: row.get::<usize, Option<serde_json::Value>>(10),
    }
}

async fn query_user_items(
    conn: &deadpool_postgres::Object,
    user_id: &i64,
) -> error::Result<Vec<VaultItem>> {
    let query = format!(
        "\
        select {ITEM_COLUMNS} \
        from vault_item \
        where vault_item.user_id = $1 \
        order by vault_item.updated desc"
    );

    let rows = conn.query(query.as_str(), &[user_id]).await?;

    Ok(rows.iter().map(item_from_row).collect())
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    q: Option<String>,
    kind: Option<String>,
    category: Option<String>,
    favorite: Option<bool>,
}

pub async fn get(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Query(params): Query<ListParams>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let mut query = format!(
        "select {ITEM_COLUMNS} from vault_item where vault_item.user_id = $1"
    );
    let mut sql_params: sql::ParamsVec = vec![&initiator.user.id];

    let needle = params.q.as_ref()
        .map(|q| format!("%{}%", q.trim().to_lowercase()));

    if let Some(needle) = &needle {
        let index = push_param(&mut sql_params, needle);

        query.push_str(&format!(
            " and (lower(vault_item.title) like ${index} or lower(vault_item.content) like ${index})"
        ));
    }

    if let Some(kind) = &params.kind {
        let index = push_param(&mut sql_params, kind);

        query.push_str(&format!(" and vault_item.kind = ${index}"));
    }

    if let Some(category) = &params.category {
        let index = push_param(&mut sql_params, category);

        query.push_str(&format!(" and vault_item.category = ${index}"));
    }

    if let Some(favorite) = &params.favorite {
        let index = push_param(&mut sql_params, favorite);

        query.push_str(&format!(" and vault_item.is_favorite = ${index}"));
    }

    query.push_str(" order by vault_item.updated desc");

    let rows = conn.query(query.as_str(), sql_params.as_slice()).await?;

    let list: Vec<VaultItem> = rows.iter().map(item_from_row).collect();

    Ok(Payload::new(list))
}

pub async fn post(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<CreateVaultItem>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if !validation::title_valid(&json.title) {
        return Err(error::Error::api((
            GeneralKind::ValidationFailed,
            "invalid item title"
        )));
    }

    let id = nanoid::nanoid!();
    let category = json.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());
    let tags = json.tags.unwrap_or_default();
    let is_private = json.is_private.unwrap_or(true);

    let row = conn.query_one(
        "\
        insert into vault_item (id, user_id, title, content, kind, category, tags, is_private, metadata) values \
        ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
        returning created, updated",
        &[
            &id,
            &initiator.user.id,
            &json.title,
            &json.content,
            &json.kind,
            &category,
            &tags,
            &is_private,
            &json.metadata,
        ]
    ).await?;

    Ok((
        StatusCode::CREATED,
        Payload::new(VaultItem {
            id,
            title: json.title,
            content: json.content,
            kind: json.kind,
            category,
            tags,
            is_private,
            is_favorite: false,
            created: row.get(0),
            updated: row.get(1),
            metadata: json.metadata,
        })
    ))
}

pub async fn stats(
    State(state): State<ArcShared>,
    initiator: Initiator,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let items = query_user_items(&conn, &initiator.user.id).await?;

    let mut by_kind: HashMap<String, usize> = HashMap::new();
    let mut categories: Vec<String> = Vec::new();
    let mut favorites = 0;
    let mut private = 0;

    for item in &items {
        *by_kind.entry(item.kind.clone()).or_insert(0) += 1;

        if !categories.contains(&item.category) {
            categories.push(item.category.clone());
        }

        if item.is_favorite {
            favorites += 1;
        }

        if item.is_private {
            private += 1;
        }
    }

    categories.sort();

    // items come back newest first
    let recently_added: Vec<VaultItem> = items.iter()
        .take(5)
        .cloned()
        .collect();

    Ok(Payload::new(VaultStats {
        total: items.len(),
        by_kind,
        favorites,
        private,
        categories,
        recently_added,
    }))
}

pub async fn export(
    State(state): State<ArcShared>,
    initiator: Initiator,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let items = query_user_items(&conn, &initiator.user.id).await?;

    Ok(Payload::new(VaultExport {
        export_date: Utc::now(),
        user_id: initiator.user.id,
        item_count: items.len(),
        items,
    }))
}
