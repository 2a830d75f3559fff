use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum UnpackError {
    #[error("directory '{0}' already exists")]
    ProductDirExists(PathBuf),
    #[error("expected exactly one top level entry in the archive, found {entries}")]
    ArchiveLayout { entries: usize },
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Extracts `archive` into a scratch directory and copies its single top
/// level directory to `product_dir`. The scratch directory is removed on
/// every path out of this function.
///
/// Refuses to touch a `product_dir` that already exists.
pub fn unpack_to_product_directory(archive: &Path, product_dir: &Path) -> Result<(), UnpackError> {
    if product_dir.is_dir() {
        return Err(UnpackError::ProductDirExists(product_dir.to_path_buf()));
    }

    let scratch = tempfile::tempdir()?;
    let mut zip = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    zip.extract(scratch.path())?;

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(scratch.path())? {
        entries.push(entry?.path());
    }
    if entries.len() != 1 {
        return Err(UnpackError::ArchiveLayout {
            entries: entries.len(),
        });
    }
    copy_dir_all(&entries[0], product_dir)?;
    Ok(())
}

fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let dest = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &dest)?;
        } else {
            std::fs::copy(entry.path(), dest)?;
        }
    }
    Ok(())
}
