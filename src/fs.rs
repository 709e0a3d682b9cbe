use std::path::{Path, PathBuf};

use groupdesk_lib::fs::VirtualPath;

pub mod entry;
pub mod archive;
pub mod meta;

/// largest file accepted in an upload batch
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// maps a client visible path onto the physical share.
///
/// the join is exactly root + path minus its leading separator. segments are
/// not inspected, so the result is deterministic for any given input
pub fn resolve<P>(storage: P, path: &VirtualPath) -> PathBuf
where
    P: AsRef<Path>
{
    storage.as_ref().join(path.relative())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve_joins_onto_the_root() {
        let root = Path::new("/srv/share");

        assert_eq!(
            resolve(root, &VirtualPath::from_request("/Docs/report.pdf")),
            PathBuf::from("/srv/share/Docs/report.pdf")
        );
        assert_eq!(
            resolve(root, &VirtualPath::root()),
            PathBuf::from("/srv/share")
        );
    }

    #[test]
    fn resolve_is_idempotent_per_input() {
        let root = Path::new("/srv/share");
        let path = VirtualPath::from_request("/a/b/c");

        assert_eq!(resolve(root, &path), resolve(root, &path));
    }
}
