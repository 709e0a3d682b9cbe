use std::fs::Metadata;
use std::path::Path;

use chrono::{DateTime, Utc};

use groupdesk_api::fs::{EntryKind, FileEntry};
use groupdesk_lib::fs::VirtualPath;

use crate::net::mime::mime_from_ext;

pub const SYSTEM_OWNER: &str = "system";

fn system_time_opt(result: std::io::Result<std::time::SystemTime>) -> Option<DateTime<Utc>> {
    result.ok().map(DateTime::<Utc>::from)
}

/// builds the client view of a directory child from its filesystem metadata.
///
/// ownership fields start as the "system" placeholder and are replaced when
/// a metadata row is merged in afterwards
pub fn build_entry(path: VirtualPath, meta: &Metadata) -> FileEntry {
    let name = path.file_name()
        .unwrap_or("")
        .to_owned();
    let kind = if meta.is_dir() {
        EntryKind::Folder
    } else {
        EntryKind::File
    };
    let size = match kind {
        EntryKind::Folder => 0,
        EntryKind::File => meta.len(),
    };
    // keeps the leading dot, ".pdf" not "pdf"
    let extension = match kind {
        EntryKind::Folder => None,
        EntryKind::File => path.extension()
            .map(str::to_ascii_lowercase),
    };
    let mime = match kind {
        EntryKind::Folder => String::from("inode/directory"),
        EntryKind::File => mime_from_ext(extension.as_deref()).to_string(),
    };

    FileEntry {
        id: path.id(),
        name,
        kind,
        size,
        parent_path: path.parent(),
        path,
        extension,
        mime,
        created: system_time_opt(meta.created()),
        modified: system_time_opt(meta.modified()),
        created_by: SYSTEM_OWNER.to_owned(),
        modified_by: SYSTEM_OWNER.to_owned(),
        is_shared: false,
        is_starred: false,
        tags: Vec::new(),
        version: 1,
    }
}

/// reads the children of a directory on the share.
///
/// entries whose names are not valid utf-8 are skipped with a warning since
/// they cannot be represented in a virtual path
pub fn read_dir_entries<P>(dir: P, parent: &VirtualPath) -> std::io::Result<Vec<FileEntry>>
where
    P: AsRef<Path>
{
    let mut rtn = Vec::new();

    for result in std::fs::read_dir(dir)? {
        let dir_entry = result?;

        let name = match dir_entry.file_name().into_string() {
            Ok(name) => name,
            Err(os_name) => {
                tracing::warn!("skipping non utf-8 entry name: {os_name:?}");

                continue;
            }
        };

        let meta = dir_entry.metadata()?;

        rtn.push(build_entry(parent.join(name), &meta));
    }

    Ok(rtn)
}

/// folders first, then case-insensitive by name
pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| {
        match (a.kind, b.kind) {
            (EntryKind::Folder, EntryKind::File) => std::cmp::Ordering::Less,
            (EntryKind::File, EntryKind::Folder) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase())
        }
    });
}

#[cfg(test)]
mod test {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"data").unwrap();
    }

    #[test]
    fn entries_reflect_the_directory() {
        let dir = tempfile::tempdir().unwrap();

        touch(&dir.path().join("report.PDF"));
        std::fs::create_dir(dir.path().join("Nested")).unwrap();

        let parent = VirtualPath::root();
        let entries = read_dir_entries(dir.path(), &parent).unwrap();

        assert_eq!(entries.len(), 2);

        let file = entries.iter().find(|e| e.kind == EntryKind::File).unwrap();

        assert_eq!(file.name, "report.PDF");
        assert_eq!(file.size, 4);
        assert_eq!(file.extension.as_deref(), Some(".pdf"));
        assert_eq!(file.mime, "application/pdf");
        assert_eq!(file.path.as_str(), "/report.PDF");
        assert_eq!(file.created_by, SYSTEM_OWNER);

        let folder = entries.iter().find(|e| e.kind == EntryKind::Folder).unwrap();

        assert_eq!(folder.name, "Nested");
        assert_eq!(folder.size, 0);
        assert_eq!(folder.extension, None);
    }

    #[test]
    fn sort_puts_folders_first_then_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();

        touch(&dir.path().join("beta.txt"));
        touch(&dir.path().join("Alpha.txt"));
        std::fs::create_dir(dir.path().join("zulu")).unwrap();
        std::fs::create_dir(dir.path().join("Echo")).unwrap();

        let mut entries = read_dir_entries(dir.path(), &VirtualPath::root()).unwrap();
        sort_entries(&mut entries);

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, ["Echo", "zulu", "Alpha.txt", "beta.txt"]);
    }
}
