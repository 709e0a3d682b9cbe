use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::Utc;

use groupdesk_api::Payload;
use groupdesk_api::tasks::{TaskStatus, UpdateTask};

use crate::net::error::{self, GeneralKind};
use crate::sec::authn::Initiator;
use crate::sql::{self, push_param, write_set};
use crate::state::ArcShared;

use super::{task_from_row, TASK_COLUMNS};

async fn query_task(
    conn: &deadpool_postgres::Object,
    task_id: &i64,
) -> error::Result<Option<groupdesk_api::tasks::Task>> {
    let query = format!("select {TASK_COLUMNS} from tasks where tasks.id = $1");

    match conn.query_opt(query.as_str(), &[task_id]).await? {
        Some(row) => Ok(Some(task_from_row(&row)?)),
        None => Ok(None)
    }
}

pub async fn get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(task_id): Path<i64>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let Some(found) = query_task(&conn, &task_id).await? else {
        return Err(error::Error::api((
            GeneralKind::NotFound,
            "task was not found"
        )));
    };

    Ok(Payload::new(found))
}

pub async fn patch(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(task_id): Path<i64>,
    axum::Json(json): axum::Json<UpdateTask>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if !json.has_work() {
        return Err(error::Error::api((
            GeneralKind::NoWork,
            "no changes were given"
        )));
    }

    if query_task(&conn, &task_id).await?.is_none() {
        return Err(error::Error::api((
            GeneralKind::NotFound,
            "task was not found"
        )));
    }

    let mut update_query = String::from("update tasks set");
    let mut params: sql::ParamsVec = vec![&task_id];

    let status_str = json.status.map(|v| v.as_ref().to_owned());
    let priority_str = json.priority.map(|v| v.as_ref().to_owned());

    // marking a task completed stamps the completion time unless the client
    // supplied one
    let completed = match (json.status, json.completed) {
        (Some(TaskStatus::Completed), None) => Some(Utc::now()),
        (_, given) => given,
    };

    if let Some(title) = &json.title {
        write_set(&mut update_query, "title", push_param(&mut params, title));
    }

    if let Some(description) = &json.description {
        write_set(&mut update_query, "description", push_param(&mut params, description));
    }

    if let Some(status) = &status_str {
        write_set(&mut update_query, "status", push_param(&mut params, status));
    }

    if let Some(priority) = &priority_str {
        write_set(&mut update_query, "priority", push_param(&mut params, priority));
    }

    if let Some(project_id) = &json.project_id {
        write_set(&mut update_query, "project_id", push_param(&mut params, project_id));
    }

    if let Some(assigned_to) = &json.assigned_to {
        write_set(&mut update_query, "assigned_to", push_param(&mut params, assigned_to));
    }

    if let Some(due) = &json.due {
        write_set(&mut update_query, "due", push_param(&mut params, due));
    }

    if let Some(completed) = &completed {
        write_set(&mut update_query, "completed", push_param(&mut params, completed));
    }

    update_query.push_str(" where id = $1");

    conn.execute(update_query.as_str(), params.as_slice()).await?;

    let updated = query_task(&conn, &task_id).await?
        .ok_or_else(|| error::Error::new().context("task disappeared during update"))?;

    Ok(Payload::new(updated))
}

pub async fn delete(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(task_id): Path<i64>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let count = conn.execute(
        "delete from tasks where id = $1",
        &[&task_id]
    ).await?;

    if count != 1 {
        return Err(error::Error::api((
            GeneralKind::NotFound,
            "task was not found"
        )));
    }

    Ok(Payload::new(()))
}
