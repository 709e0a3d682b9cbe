use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// stat that folds "does not exist" into the return value instead of the
/// error channel
pub fn metadata<P>(path: P) -> Result<Option<Metadata>, std::io::Error>
where
    P: AsRef<Path>
{
    match path.as_ref().metadata() {
        Ok(meta) => Ok(Some(meta)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// lexically collapses `.` and `..` components. never touches the
/// filesystem, so symlinks are not resolved
pub fn normalize<P>(path: P) -> PathBuf
where
    P: AsRef<Path>
{
    let mut rtn = PathBuf::new();

    for comp in path.as_ref().components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                rtn.pop();
            }
            keep => rtn.push(keep.as_os_str()),
        }
    }

    rtn
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn metadata_maps_missing_to_none() {
        let dir = tempfile::tempdir().unwrap();

        assert!(metadata(dir.path().join("not-here")).unwrap().is_none());
        assert!(metadata(dir.path()).unwrap().is_some());
    }

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(normalize("/a/./b/../c"), PathBuf::from("/a/c"));
        assert_eq!(normalize("a/b/.."), PathBuf::from("a"));
        // parent segments cannot climb past the start
        assert_eq!(normalize("a/../../.."), PathBuf::from(""));
    }
}
