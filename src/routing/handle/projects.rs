use std::str::FromStr;

use axum::http::StatusCode;
use axum::extract::State;
use axum::response::IntoResponse;
use futures::TryStreamExt;

use groupdesk_api::Payload;
use groupdesk_api::projects::{CreateProject, Project, ProjectStatus};
use groupdesk_lib::validation;

use crate::net::error::{self, GeneralKind};
use crate::sec::authn::Initiator;
use crate::sql;
use crate::state::ArcShared;

pub mod project_id;

pub const PROJECT_COLUMNS: &str = "\
    projects.id, \
    projects.name, \
    projects.description, \
    projects.status, \
    projects.progress, \
    projects.created_by, \
    projects.created, \
    projects.due";

pub fn project_from_row(row: &tokio_postgres::Row) -> error::Result<Project> {
    let status = ProjectStatus::from_str(row.get(3))
        .map_err(|_| error::Error::new().context("invalid status stored for project"))?;

    Ok(Project {
        id: row.get(0),
        name: row.get(1),
        description: row.get(2),
        status,
        progress: row.get(4),
        created_by: row.get(5),
        created: row.get(6),
        due: row.get(7),
    })
}

pub async fn get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let params: sql::ParamsVec = vec![];

    let query = format!("select {PROJECT_COLUMNS} from projects order by projects.created desc");
    let result = conn.query_raw(query.as_str(), params).await?;

    futures::pin_mut!(result);

    let mut list = Vec::new();

    while let Some(row) = result.try_next().await? {
        list.push(project_from_row(&row)?);
    }

    Ok(Payload::new(list))
}

pub async fn post(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<CreateProject>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if !validation::title_valid(&json.name) {
        return Err(error::Error::api((
            GeneralKind::ValidationFailed,
            "invalid project name"
        )));
    }

    let status = ProjectStatus::Active;

    let row = conn.query_one(
        "\
        insert into projects (name, description, status, progress, created_by, due) values \
        ($1, $2, $3, 0, $4, $5) \
        returning id, created",
        &[
            &json.name,
            &json.description,
            &status.as_ref(),
            &initiator.user.id,
            &json.due,
        ]
    ).await?;

    Ok((
        StatusCode::CREATED,
        Payload::new(Project {
            id: row.get(0),
            name: json.name,
            description: json.description,
            status,
            progress: 0,
            created_by: initiator.user.id,
            created: row.get(1),
            due: json.due,
        })
    ))
}
