use std::path::Path;

use axum::http::StatusCode;
use axum::extract::{Multipart, Query, State};
use axum::extract::multipart::Field;
use axum::response::IntoResponse;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;

use groupdesk_api::Payload;
use groupdesk_api::fs::{
    CreateFolder,
    EntryKind,
    FileEntry,
    FileListing,
    MoveEntry,
    NewLocation,
    SearchResults,
    ServerStatus,
    UploadResponse,
    UploadResult,
};
use groupdesk_lib::fs::VirtualPath;
use groupdesk_lib::validation;

use crate::activity;
use crate::fs::{self, entry, meta, MAX_FILE_SIZE};
use crate::net::error::{self, ApiError, Context, FsKind, GeneralKind};
use crate::path::metadata;
use crate::sec::authn::Initiator;
use crate::state::ArcShared;

pub mod file_id;

pub const SEARCH_RESULT_CAP: usize = 100;

#[derive(Debug, Deserialize)]
pub struct PathParams {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: String,
    path: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
}

pub async fn get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Query(params): Query<PathParams>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let path = VirtualPath::from_request(params.path.unwrap_or_default());
    let full = fs::resolve(state.storage(), &path);

    let Some(found) = metadata(&full)? else {
        // first visit to a share folder provisions it
        std::fs::create_dir_all(&full)?;

        tracing::info!("provisioned missing share directory \"{path}\"");

        return Ok(Payload::new(FileListing {
            path,
            total_items: 0,
            files: Vec::new(),
        }));
    };

    if !found.is_dir() {
        return Err(error::Error::api((
            GeneralKind::InvalidData,
            "path is not a directory"
        )));
    }

    let mut files = entry::read_dir_entries(&full, &path)?;

    let paths: Vec<String> = files.iter()
        .map(|e| e.path.as_str().to_owned())
        .collect();
    let known = meta::lookup_paths(&conn, &paths).await;

    meta::merge_owners(&mut files, known);
    entry::sort_entries(&mut files);

    Ok(Payload::new(FileListing {
        path,
        total_items: files.len(),
        files,
    }))
}

/// always 200. an unreachable share degrades to disconnected with zeroed
/// space counters instead of an error
pub async fn status(
    State(state): State<ArcShared>,
    _initiator: Initiator,
) -> Payload<ServerStatus> {
    let connected = matches!(metadata(state.storage()), Ok(Some(meta)) if meta.is_dir());

    let (total_space, used_space) = if connected {
        disk_usage(state.storage())
    } else {
        (0, 0)
    };

    Payload::new(ServerStatus {
        connected,
        total_space,
        used_space,
        server_path: state.server_path().to_owned(),
    })
}

fn disk_usage(storage: &Path) -> (u64, u64) {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    let mut best: Option<&sysinfo::Disk> = None;

    for disk in disks.list() {
        if storage.starts_with(disk.mount_point()) {
            let keep = match best {
                Some(found) => {
                    disk.mount_point().as_os_str().len() > found.mount_point().as_os_str().len()
                }
                None => true
            };

            if keep {
                best = Some(disk);
            }
        }
    }

    match best {
        Some(disk) => (
            disk.total_space(),
            disk.total_space().saturating_sub(disk.available_space())
        ),
        None => (0, 0)
    }
}

pub async fn search(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Query(params): Query<SearchParams>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let needle = params.q.trim().to_lowercase();

    if needle.is_empty() {
        return Err(error::Error::api((
            GeneralKind::MissingData,
            "search query cannot be empty"
        )));
    }

    let kind = match params.kind.as_deref() {
        None => None,
        Some("file") => Some(EntryKind::File),
        Some("folder") => Some(EntryKind::Folder),
        Some(_) => {
            return Err(error::Error::api((
                GeneralKind::InvalidData,
                "kind must be \"file\" or \"folder\""
            )));
        }
    };

    let start = VirtualPath::from_request(params.path.unwrap_or_default());
    let start_full = fs::resolve(state.storage(), &start);

    let mut results = search_tree(start_full, start, &needle, kind)?;

    let paths: Vec<String> = results.iter()
        .map(|e| e.path.as_str().to_owned())
        .collect();
    let known = meta::lookup_paths(&conn, &paths).await;

    meta::merge_owners(&mut results, known);
    entry::sort_entries(&mut results);

    Ok(Payload::new(SearchResults {
        query: params.q,
        total_results: results.len(),
        results,
    }))
}

/// depth-first name match over the whole share. unreadable directories are
/// skipped so one bad mount point does not fail the search
fn search_tree(
    start: std::path::PathBuf,
    start_path: VirtualPath,
    needle: &str,
    kind: Option<EntryKind>,
) -> std::io::Result<Vec<FileEntry>> {
    let mut rtn = Vec::new();
    let mut stack = vec![(start, start_path)];

    while let Some((dir, vpath)) = stack.pop() {
        let read = match entry::read_dir_entries(&dir, &vpath) {
            Ok(read) => read,
            Err(err) => {
                tracing::warn!("skipping unreadable directory during search: {err}");

                continue;
            }
        };

        for found in read {
            if found.kind == EntryKind::Folder {
                stack.push((dir.join(&found.name), found.path.clone()));
            }

            if let Some(want) = kind {
                if found.kind != want {
                    continue;
                }
            }

            if found.name.to_lowercase().contains(needle) {
                rtn.push(found);

                if rtn.len() == SEARCH_RESULT_CAP {
                    return Ok(rtn);
                }
            }
        }
    }

    Ok(rtn)
}

pub async fn create_folder(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<CreateFolder>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if !validation::entry_name_valid(&json.name) {
        return Err(error::Error::api((
            GeneralKind::ValidationFailed,
            "invalid folder name"
        )));
    }

    let parent = VirtualPath::from_request(json.path.unwrap_or_default());
    let path = parent.join(&json.name);
    let full = fs::resolve(state.storage(), &path);

    if metadata(&full)?.is_some() {
        return Err(error::Error::api((
            GeneralKind::AlreadyExists,
            "an entry with that name already exists"
        )));
    }

    std::fs::create_dir_all(&full)?;

    let created = std::fs::metadata(&full)?;
    let mut rtn = entry::build_entry(path.clone(), &created);

    if meta::record_write(&conn, &path, &initiator.user.username).await {
        rtn.created_by = initiator.user.username.clone();
        rtn.modified_by = initiator.user.username.clone();
    }

    activity::record(
        &conn,
        Some(initiator.user.id),
        "folder_created",
        path.as_str()
    ).await;

    Ok((StatusCode::CREATED, Payload::new(rtn)))
}

pub async fn upload(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Query(params): Query<PathParams>,
    mut multipart: Multipart,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let mut dest = VirtualPath::from_request(params.path.unwrap_or_default());
    let mut uploaded = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("path") => {
                // a path part overrides the query for parts after it
                dest = VirtualPath::from_request(field.text().await?);

                continue;
            }
            Some("files") => {}
            _ => {
                continue;
            }
        }

        let Some(name) = field.file_name().map(str::to_owned) else {
            uploaded.push(UploadResult::Failed {
                name: String::new(),
                error: ApiError::from((
                    GeneralKind::MissingData,
                    "file part is missing a filename"
                )),
            });

            continue;
        };

        if !validation::entry_name_valid(&name) {
            uploaded.push(UploadResult::Failed {
                name,
                error: ApiError::from((
                    GeneralKind::ValidationFailed,
                    "invalid file name"
                )),
            });

            continue;
        }

        let path = dest.join(&name);

        match save_field(&state, field, &path).await {
            Ok(saved) => {
                let mut entry = entry::build_entry(path.clone(), &saved);
                let recorded = meta::record_write(&conn, &path, &initiator.user.username).await;

                if recorded {
                    entry.created_by = initiator.user.username.clone();
                    entry.modified_by = initiator.user.username.clone();
                }

                activity::record(
                    &conn,
                    Some(initiator.user.id),
                    "file_uploaded",
                    path.as_str()
                ).await;

                uploaded.push(UploadResult::Saved {
                    entry,
                    metadata_recorded: recorded,
                });
            }
            Err(SaveError::TooLarge) => {
                uploaded.push(UploadResult::Failed {
                    name,
                    error: ApiError::from((
                        FsKind::MaxSize,
                        format!("file exceeds the {MAX_FILE_SIZE} byte limit")
                    )),
                });
            }
            Err(SaveError::Failed(err)) => {
                return Err(err);
            }
        }
    }

    if uploaded.is_empty() {
        return Err(error::Error::api((
            FsKind::NoFiles,
            "no file parts were given"
        )));
    }

    Ok(Payload::new(UploadResponse {
        path: dest,
        uploaded,
    }))
}

#[derive(Debug)]
enum SaveError {
    TooLarge,
    Failed(error::Error),
}

impl From<error::Error> for SaveError {
    fn from(err: error::Error) -> Self {
        SaveError::Failed(err)
    }
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::Failed(err.into())
    }
}

impl From<axum::extract::multipart::MultipartError> for SaveError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        SaveError::Failed(err.into())
    }
}

/// stages the part in tmp while counting bytes, then renames into the share.
///
/// a part that crosses the size cap is dropped with its staged data; the
/// destination is never touched for a rejected file
async fn save_field(
    state: &ArcShared,
    field: Field<'_>,
    path: &VirtualPath,
) -> Result<std::fs::Metadata, SaveError> {
    let staged = state.tmp().join(format!("upload-{}", nanoid::nanoid!()));
    let full = fs::resolve(state.storage(), path);

    stage_chunks(&staged, field, MAX_FILE_SIZE).await?;

    if let Some(parent) = full.parent() {
        if let Err(err) = tokio::fs::create_dir_all(parent).await {
            let _ = tokio::fs::remove_file(&staged).await;

            return Err(SaveError::from(err));
        }
    }

    // same name overwrites, last writer wins
    if let Err(_rename) = tokio::fs::rename(&staged, &full).await {
        let copied = tokio::fs::copy(&staged, &full).await;
        let _ = tokio::fs::remove_file(&staged).await;

        if let Err(err) = copied {
            return Err(SaveError::from(err));
        }
    }

    Ok(std::fs::metadata(&full)?)
}

/// writes a chunk stream to the staged path, removing it again if anything
/// goes wrong along the way
async fn stage_chunks<S, E>(staged: &Path, chunks: S, cap: u64) -> Result<(), SaveError>
where
    S: Stream<Item = Result<Bytes, E>>,
    SaveError: From<E>,
{
    let result = write_chunks(staged, chunks, cap).await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(staged).await;
    }

    result
}

async fn write_chunks<S, E>(staged: &Path, chunks: S, cap: u64) -> Result<(), SaveError>
where
    S: Stream<Item = Result<Bytes, E>>,
    SaveError: From<E>,
{
    futures::pin_mut!(chunks);

    let mut file = tokio::fs::File::create(staged).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = chunks.try_next().await? {
        // checked before the write so the overflowing chunk never lands
        if written + chunk.len() as u64 > cap {
            return Err(SaveError::TooLarge);
        }

        file.write_all(&chunk).await?;

        written += chunk.len() as u64;
    }

    file.flush().await?;

    Ok(())
}

pub async fn move_entry(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<MoveEntry>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let source = json.source.decode()?;

    if source.is_root() {
        return Err(error::Error::api((
            GeneralKind::InvalidData,
            "cannot move the share root"
        )));
    }

    let source_full = fs::resolve(state.storage(), &source);

    if metadata(&source_full)?.is_none() {
        return Err(error::Error::api(FsKind::NotFound));
    }

    let name = source.file_name()
        .context("non root path is missing a file name")?
        .to_owned();
    let dest_dir = VirtualPath::from_request(&json.destination);
    let path = dest_dir.join(&name);
    let full = fs::resolve(state.storage(), &path);

    if metadata(&full)?.is_some() {
        return Err(error::Error::api((
            GeneralKind::AlreadyExists,
            "an entry with that name already exists at the destination"
        )));
    }

    let dest_dir_full = fs::resolve(state.storage(), &dest_dir);

    tokio::fs::create_dir_all(&dest_dir_full).await?;
    tokio::fs::rename(&source_full, &full).await?;

    meta::record_move(&conn, &source, &path).await;

    activity::record(
        &conn,
        Some(initiator.user.id),
        "file_moved",
        format!("{source} -> {path}")
    ).await;

    Ok(Payload::new(NewLocation { path }))
}

#[cfg(test)]
mod test {
    use futures::stream;

    use super::*;

    fn chunks(parts: Vec<&'static [u8]>) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
        stream::iter(parts.into_iter().map(|part| Ok(Bytes::from_static(part))))
    }

    #[tokio::test]
    async fn staging_keeps_a_stream_at_the_cap() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("staged");

        let parts: Vec<&'static [u8]> = vec![b"hello ", b"world"];

        stage_chunks(&staged, chunks(parts), 11).await.unwrap();

        assert_eq!(std::fs::read(&staged).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn chunk_crossing_the_cap_aborts_and_removes_the_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("staged");

        let parts: Vec<&'static [u8]> = vec![&[0u8; 8], &[0u8; 8], b"x"];

        let result = stage_chunks(&staged, chunks(parts), 16).await;

        assert!(matches!(result, Err(SaveError::TooLarge)));
        assert!(!staged.exists());
        // nothing else was written either; the destination is only ever
        // touched after staging succeeds
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn stream_error_removes_the_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("staged");

        let parts = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::Other, "connection reset")),
        ];
        let result = stage_chunks(&staged, stream::iter(parts), 1024).await;

        assert!(matches!(result, Err(SaveError::Failed(_))));
        assert!(!staged.exists());
    }
}
