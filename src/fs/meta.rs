use std::collections::HashMap;

use deadpool_postgres::GenericClient;

use groupdesk_api::fs::FileEntry;
use groupdesk_lib::fs::VirtualPath;

/// ownership columns carried by a file_metadata row
#[derive(Debug)]
pub struct OwnerInfo {
    pub created_by: String,
    pub modified_by: String,
    pub is_shared: bool,
    pub is_starred: bool,
    pub tags: Vec<String>,
    pub version: i32,
}

/// loads metadata rows for a set of paths. read failures degrade to an empty
/// map so a listing still succeeds with placeholder owners
pub async fn lookup_paths(
    conn: &impl GenericClient,
    paths: &[String],
) -> HashMap<String, OwnerInfo> {
    let result = conn.query(
        "\
        select file_metadata.path, \
               file_metadata.created_by, \
               file_metadata.modified_by, \
               file_metadata.is_shared, \
               file_metadata.is_starred, \
               file_metadata.tags, \
               file_metadata.version \
        from file_metadata \
        where file_metadata.path = any($1)",
        &[&paths]
    ).await;

    let rows = match result {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!("failed to load file metadata: {err}");

            return HashMap::new();
        }
    };

    let mut rtn = HashMap::with_capacity(rows.len());

    for row in rows {
        rtn.insert(row.get(0), OwnerInfo {
            created_by: row.get(1),
            modified_by: row.get(2),
            is_shared: row.get(3),
            is_starred: row.get(4),
            tags: row.get(5),
            version: row.get(6),
        });
    }

    rtn
}

pub fn merge_owners(entries: &mut [FileEntry], mut known: HashMap<String, OwnerInfo>) {
    for entry in entries {
        if let Some(info) = known.remove(entry.path.as_str()) {
            entry.created_by = info.created_by;
            entry.modified_by = info.modified_by;
            entry.is_shared = info.is_shared;
            entry.is_starred = info.is_starred;
            entry.tags = info.tags;
            entry.version = info.version;
        }
    }
}

/// best effort upsert after a successful filesystem write. returns whether
/// the row landed; a failure is logged and never fails the operation
pub async fn record_write(
    conn: &impl GenericClient,
    path: &VirtualPath,
    username: &str,
) -> bool {
    let result = conn.execute(
        "\
        insert into file_metadata (path, created_by, modified_by) values \
        ($1, $2, $2) \
        on conflict (path) do update \
        set modified_by = excluded.modified_by, \
            modified = now(), \
            version = file_metadata.version + 1",
        &[&path.as_str(), &username]
    ).await;

    match result {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!("failed to record file metadata for \"{path}\": {err}");

            false
        }
    }
}

/// best effort removal of the row for a path and everything under it
pub async fn record_delete(conn: &impl GenericClient, path: &VirtualPath) {
    let prefix = format!("{}/%", path.as_str());

    let result = conn.execute(
        "delete from file_metadata where path = $1 or path like $2",
        &[&path.as_str(), &prefix]
    ).await;

    if let Err(err) = result {
        tracing::warn!("failed to remove file metadata for \"{path}\": {err}");
    }
}

/// best effort path rewrite after a move or rename
pub async fn record_move(
    conn: &impl GenericClient,
    from: &VirtualPath,
    to: &VirtualPath,
) {
    let prefix = format!("{}/%", from.as_str());

    let result = conn.execute(
        "\
        update file_metadata \
        set path = $2 || substr(path, char_length($1) + 1) \
        where path = $1 or path like $3",
        &[&from.as_str(), &to.as_str(), &prefix]
    ).await;

    if let Err(err) = result {
        tracing::warn!("failed to move file metadata for \"{from}\": {err}");
    }
}
