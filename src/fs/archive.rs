use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::net::error::{self, Context};

/// a zip artifact staged in the tmp directory. the file is removed when the
/// handle drops, whether or not the download completed
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
}

impl Archive {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Archive {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "failed to remove archive artifact \"{}\": {err}",
                    self.path.display()
                );
            }
        }
    }
}

/// zips a directory of the share into a tmp artifact.
///
/// entry names are relative to the archived directory so extraction recreates
/// its contents in place. runs on the blocking pool
pub async fn zip_directory(tmp: &Path, source: PathBuf) -> error::Result<Archive> {
    let artifact = tmp.join(format!("archive-{}.zip", nanoid::nanoid!()));
    let artifact_clone = artifact.clone();

    let result = tokio::task::spawn_blocking(move || {
        write_zip(&artifact_clone, &source)
    }).await;

    // an early drop cleans up the partial artifact on any failure
    let cleanup = Archive { path: artifact };

    match result {
        Ok(Ok(())) => Ok(cleanup),
        Ok(Err(err)) => Err(err),
        Err(join_err) => Err(error::Error::from(join_err)
            .context("archive task panicked")),
    }
}

fn write_zip(artifact: &Path, source: &Path) -> error::Result<()> {
    let file = std::fs::File::create(artifact)
        .context("failed to create archive artifact")?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    add_directory(&mut zip, options, source, Path::new(""))?;

    zip.finish()
        .context("failed to finalize archive")?;

    Ok(())
}

fn add_directory(
    zip: &mut ZipWriter<std::fs::File>,
    options: SimpleFileOptions,
    dir: &Path,
    rel: &Path,
) -> error::Result<()> {
    let mut buffer = Vec::new();

    for result in std::fs::read_dir(dir)
        .context("failed to read directory for archive")? {
        let dir_entry = result
            .context("failed to read directory entry for archive")?;
        let name = dir_entry.file_name();
        let rel_path = rel.join(&name);
        let rel_str = rel_path.to_string_lossy().replace('\\', "/");
        let file_type = dir_entry.file_type()
            .context("failed to read entry type for archive")?;

        if file_type.is_dir() {
            zip.add_directory(format!("{rel_str}/"), options)?;

            add_directory(zip, options, &dir_entry.path(), &rel_path)?;
        } else if file_type.is_file() {
            zip.start_file(rel_str, options)?;

            let mut file = std::fs::File::open(dir_entry.path())
                .context("failed to open file for archive")?;

            buffer.clear();
            file.read_to_end(&mut buffer)
                .context("failed to read file for archive")?;
            zip.write_all(&buffer)
                .context("failed to write file into archive")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn zip_round_trips_directory_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tempfile::tempdir().unwrap();

        std::fs::write(source.path().join("a.txt"), b"alpha").unwrap();
        std::fs::create_dir(source.path().join("nested")).unwrap();
        std::fs::write(source.path().join("nested/b.bin"), [0u8, 1, 2, 255]).unwrap();
        std::fs::create_dir(source.path().join("empty")).unwrap();

        let archive = zip_directory(tmp.path(), source.path().to_path_buf())
            .await
            .unwrap();

        let file = std::fs::File::open(archive.path()).unwrap();
        let mut read = zip::ZipArchive::new(file).unwrap();

        let mut a = String::new();
        read.by_name("a.txt").unwrap().read_to_string(&mut a).unwrap();
        assert_eq!(a, "alpha");

        let mut b = Vec::new();
        read.by_name("nested/b.bin").unwrap().read_to_end(&mut b).unwrap();
        assert_eq!(b, [0u8, 1, 2, 255]);

        assert!(read.by_name("empty/").is_ok());
    }

    #[tokio::test]
    async fn artifact_is_removed_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tempfile::tempdir().unwrap();

        std::fs::write(source.path().join("a.txt"), b"alpha").unwrap();

        let archive = zip_directory(tmp.path(), source.path().to_path_buf())
            .await
            .unwrap();
        let artifact = archive.path().to_path_buf();

        assert!(artifact.is_file());

        drop(archive);

        assert!(!artifact.exists());
    }
}
