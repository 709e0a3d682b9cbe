use axum::extract::{Path, State};
use axum::response::IntoResponse;

use groupdesk_api::Payload;
use groupdesk_api::projects::UpdateProject;

use crate::net::error::{self, GeneralKind};
use crate::sec::authn::Initiator;
use crate::sql::{self, push_param, write_set};
use crate::state::ArcShared;

use super::{project_from_row, PROJECT_COLUMNS};

async fn query_project(
    conn: &deadpool_postgres::Object,
    project_id: &i64,
) -> error::Result<Option<groupdesk_api::projects::Project>> {
    let query = format!("select {PROJECT_COLUMNS} from projects where projects.id = $1");

    match conn.query_opt(query.as_str(), &[project_id]).await? {
        Some(row) => Ok(Some(project_from_row(&row)?)),
        None => Ok(None)
    }
}

pub async fn get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(project_id): Path<i64>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let Some(found) = query_project(&conn, &project_id).await? else {
        return Err(error::Error::api((
            GeneralKind::NotFound,
            "project was not found"
        )));
    };

    Ok(Payload::new(found))
}

pub async fn patch(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(project_id): Path<i64>,
    axum::Json(json): axum::Json<UpdateProject>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if !json.has_work() {
        return Err(error::Error::api((
            GeneralKind::NoWork,
            "no changes were given"
        )));
    }

    if let Some(progress) = json.progress {
        if !(0..=100).contains(&progress) {
            return Err(error::Error::api((
                GeneralKind::InvalidData,
                "progress must be between 0 and 100"
            )));
        }
    }

    if query_project(&conn, &project_id).await?.is_none() {
        return Err(error::Error::api((
            GeneralKind::NotFound,
            "project was not found"
        )));
    }

    let mut update_query = String::from("update projects set");
    let mut params: sql::ParamsVec = vec![&project_id];

    let status_str = json.status.map(|v| v.as_ref().to_owned());

    if let Some(name) = &json.name {
        write_set(&mut update_query, "name", push_param(&mut params, name));
    }

    if let Some(description) = &json.description {
        write_set(&mut update_query, "description", push_param(&mut params, description));
    }

    if let Some(status) = &status_str {
        write_set(&mut update_query, "status", push_param(&mut params, status));
    }

    if let Some(progress) = &json.progress {
        write_set(&mut update_query, "progress", push_param(&mut params, progress));
    }

    if let Some(due) = &json.due {
        write_set(&mut update_query, "due", push_param(&mut params, due));
    }

    update_query.push_str(" where id = $1");

    conn.execute(update_query.as_str(), params.as_slice()).await?;

    let updated = query_project(&conn, &project_id).await?
        .ok_or_else(|| error::Error::new().context("project disappeared during update"))?;

    Ok(Payload::new(updated))
}

pub async fn delete(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(project_id): Path<i64>,
) -> error::Result<impl IntoResponse> {
    let mut conn = state.pool().get().await?;

    let transaction = conn.transaction().await?;

    // tasks keep their rows but lose the project link
    transaction.execute(
        "update tasks set project_id = null where project_id = $1",
        &[&project_id]
    ).await?;

    let count = transaction.execute(
        "delete from projects where id = $1",
        &[&project_id]
    ).await?;

    transaction.commit().await?;

    if count != 1 {
        return Err(error::Error::api((
            GeneralKind::NotFound,
            "project was not found"
        )));
    }

    Ok(Payload::new(()))
}
