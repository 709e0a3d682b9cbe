use std::str::FromStr;

use axum::http::StatusCode;
use axum::extract::State;
use axum::response::IntoResponse;
use futures::TryStreamExt;

use groupdesk_api::Payload;
use groupdesk_api::tasks::{CreateTask, Task, TaskPriority, TaskStatus};
use groupdesk_lib::validation;

use crate::net::error::{self, GeneralKind};
use crate::sec::authn::Initiator;
use crate::sql;
use crate::state::ArcShared;

pub mod task_id;

pub const TASK_COLUMNS: &str = "\
    tasks.id, \
    tasks.title, \
    tasks.description, \
    tasks.status, \
    tasks.priority, \
    tasks.project_id, \
    tasks.assigned_to, \
    tasks.created_by, \
    tasks.created, \
    tasks.due, \
    tasks.completed";

pub fn task_from_row(row: &tokio_postgres::Row) -> error::Result<Task> {
    let status = TaskStatus::from_str(row.get(3))
        .map_err(|_| error::Error::new().context("invalid status stored for task"))?;
    let priority = TaskPriority::from_str(row.get(4))
        .map_err(|_| error::Error::new().context("invalid priority stored for task"))?;

    Ok(Task {
        id: row.get(0),
        title: row.get(1),
        description: row.get(2),
        status,
        priority,
        project_id: row.get(5),
        assigned_to: row.get(6),
        created_by: row.get(7),
        created: row.get(8),
        due: row.get(9),
        completed: row.get(10),
    })
}

pub async fn get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let params: sql::ParamsVec = vec![];

    let query = format!("select {TASK_COLUMNS} from tasks order by tasks.created desc");
    let result = conn.query_raw(query.as_str(), params).await?;

    futures::pin_mut!(result);

    let mut list = Vec::new();

    while let Some(row) = result.try_next().await? {
        list.push(task_from_row(&row)?);
    }

    Ok(Payload::new(list))
}

pub async fn post(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<CreateTask>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if !validation::title_valid(&json.title) {
        return Err(error::Error::api((
            GeneralKind::ValidationFailed,
            "invalid task title"
        )));
    }

    let status = TaskStatus::Pending;
    let priority = json.priority.unwrap_or(TaskPriority::Medium);

    let row = conn.query_one(
        "\
        insert into tasks (title, description, status, priority, project_id, assigned_to, created_by, due) values \
        ($1, $2, $3, $4, $5, $6, $7, $8) \
        returning id, created",
        &[
            &json.title,
            &json.description,
            &status.as_ref(),
            &priority.as_ref(),
            &json.project_id,
            &json.assigned_to,
            &initiator.user.id,
            &json.due,
        ]
    ).await?;

    Ok((
        StatusCode::CREATED,
        Payload::new(Task {
            id: row.get(0),
            title: json.title,
            description: json.description,
            status,
            priority,
            project_id: json.project_id,
            assigned_to: json.assigned_to,
            created_by: initiator.user.id,
            created: row.get(1),
            due: json.due,
            completed: None,
        })
    ))
}
