//! Filesystem primitives used by the build steps
//!
//! Every failure maps to [`BuildError::Io`] carrying the offending path.

use std::io;
use std::path::Path;

use tokio::fs;
use walkdir::WalkDir;

use crate::error::{BuildError, Result};
use crate::utils::{hash_content, to_forward_slashes};

/// Remove everything inside `dir`, keeping `dir` itself
///
/// A missing directory counts as already clean.
pub async fn clear_dir(dir: &Path) -> Result<()> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(BuildError::io(dir, e)),
    };

    while let Some(entry) = entries.next_entry().await.map_err(|e| BuildError::io(dir, e))? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(|e| BuildError::io(&path, e))?;

        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        removed.map_err(|e| BuildError::io(&path, e))?;
    }

    Ok(())
}

/// Create `dir` and any missing parents
pub async fn create_dir_all(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).await.map_err(|e| BuildError::io(dir, e))
}

/// Names of the entries directly inside `dir`, in listing order
pub async fn list_names(dir: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| BuildError::io(dir, e))?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(|e| BuildError::io(dir, e))? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(names)
}

/// Read a UTF-8 text file
pub async fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).await.map_err(|e| BuildError::io(path, e))
}

/// Write a text file, returning the number of bytes written
pub async fn write_text(path: &Path, content: &str) -> Result<u64> {
    fs::write(path, content).await.map_err(|e| BuildError::io(path, e))?;
    Ok(content.len() as u64)
}

/// Whether `path` exists; unreadable paths count as missing
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Copy a file, or a directory tree, to `dst`
///
/// Returns the total number of file bytes copied.
pub async fn copy_recursive(src: &Path, dst: &Path) -> Result<u64> {
    let metadata = fs::metadata(src).await.map_err(|e| BuildError::io(src, e))?;
    if !metadata.is_dir() {
        return fs::copy(src, dst).await.map_err(|e| BuildError::io(src, e));
    }

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            BuildError::io(path, io::Error::other(e))
        })?;

        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target).await?;
        } else {
            copied += fs::copy(entry.path(), &target)
                .await
                .map_err(|e| BuildError::io(entry.path(), e))?;
        }
    }

    Ok(copied)
}

/// SHA-256 over a file's bytes, or over every file of a directory tree
///
/// Directory entries are visited in name order, and each relative path
/// is hashed along with its contents.
pub async fn digest(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).await.map_err(|e| BuildError::io(path, e))?;
    if !metadata.is_dir() {
        let bytes = fs::read(path).await.map_err(|e| BuildError::io(path, e))?;
        return Ok(hash_content(&bytes));
    }

    let mut buffer = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::io(path, io::Error::other(e)))?;
        if entry.file_type().is_dir() {
            continue;
        }

        let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
        buffer.extend_from_slice(to_forward_slashes(relative).as_bytes());
        buffer.push(0);
        let bytes = fs::read(entry.path()).await.map_err(|e| BuildError::io(entry.path(), e))?;
        buffer.extend_from_slice(&bytes);
    }

    Ok(hash_content(&buffer))
}
