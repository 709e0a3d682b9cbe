use axum::extract::{Path, State};
use axum::response::IntoResponse;

use groupdesk_api::Payload;
use groupdesk_api::fs::{FileId, NewLocation, RenameEntry};
use groupdesk_lib::validation;

use crate::activity;
use crate::fs::{self, archive, meta};
use crate::net::error::{self, Context, FsKind, GeneralKind};
use crate::net::fs::{stream_file, Disposition};
use crate::path::metadata;
use crate::sec::authn::Initiator;
use crate::state::ArcShared;

pub async fn download(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(file_id): Path<FileId>,
) -> error::Result<impl IntoResponse> {
    let path = file_id.decode()?;
    let full = fs::resolve(state.storage(), &path);

    let Some(found) = metadata(&full)? else {
        return Err(error::Error::api(FsKind::NotFound));
    };

    if found.is_dir() {
        let name = match path.file_name() {
            Some(name) => format!("{name}.zip"),
            None => String::from("share.zip"),
        };

        let artifact = archive::zip_directory(state.tmp(), full).await?;

        // the stream holds the open handle, so the artifact may be unlinked
        // by the drop below while the download is still in flight
        let response = stream_file(name, artifact.path(), Disposition::Attachment).await?;

        return Ok(response);
    }

    let name = path.file_name()
        .context("non root file path is missing a file name")?
        .to_owned();

    stream_file(name, &full, Disposition::Attachment).await
}

pub async fn preview(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Path(file_id): Path<FileId>,
) -> error::Result<impl IntoResponse> {
    let path = file_id.decode()?;
    let full = fs::resolve(state.storage(), &path);

    let Some(found) = metadata(&full)? else {
        return Err(error::Error::api(FsKind::NotFound));
    };

    if found.is_dir() {
        return Err(error::Error::api((
            FsKind::IsDirectory,
            "cannot preview a folder"
        )));
    }

    let name = path.file_name()
        .context("non root file path is missing a file name")?
        .to_owned();

    stream_file(name, &full, Disposition::Inline).await
}

pub async fn rename(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(file_id): Path<FileId>,
    axum::Json(json): axum::Json<RenameEntry>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let source = file_id.decode()?;

    if source.is_root() {
        return Err(error::Error::api((
            GeneralKind::InvalidData,
            "cannot rename the share root"
        )));
    }

    if !validation::entry_name_valid(&json.new_name) {
        return Err(error::Error::api((
            GeneralKind::ValidationFailed,
            "invalid entry name"
        )));
    }

    let source_full = fs::resolve(state.storage(), &source);

    if metadata(&source_full)?.is_none() {
        return Err(error::Error::api(FsKind::NotFound));
    }

    let path = source.parent().join(&json.new_name);
    let full = fs::resolve(state.storage(), &path);

    if metadata(&full)?.is_some() {
        return Err(error::Error::api((
            GeneralKind::AlreadyExists,
            "an entry with that name already exists"
        )));
    }

    tokio::fs::rename(&source_full, &full).await?;

    meta::record_move(&conn, &source, &path).await;

    activity::record(
        &conn,
        Some(initiator.user.id),
        "file_renamed",
        format!("{source} -> {path}")
    ).await;

    Ok(Payload::new(NewLocation { path }))
}

pub async fn delete(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(file_id): Path<FileId>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let path = file_id.decode()?;

    if path.is_root() {
        return Err(error::Error::api((
            GeneralKind::InvalidData,
            "cannot delete the share root"
        )));
    }

    let full = fs::resolve(state.storage(), &path);

    let Some(found) = metadata(&full)? else {
        return Err(error::Error::api(FsKind::NotFound));
    };

    if found.is_dir() {
        tokio::fs::remove_dir_all(&full).await?;
    } else {
        tokio::fs::remove_file(&full).await?;
    }

    meta::record_delete(&conn, &path).await;

    activity::record(
        &conn,
        Some(initiator.user.id),
        "file_deleted",
        path.as_str()
    ).await;

    Ok(Payload::new(()))
}
