//! Crash-safe file replacement.
//!
//! # Invariants
//! - The destination is only ever swapped by `rename`, never truncated.
//! - A failed write removes its temp file.

use super::{StoreError, StoreResult};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes `contents` to a sibling temp file, syncs it, then renames it over
/// `path`.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> StoreResult<()> {
    ensure_parent_dir(path)?;

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> StoreResult<()> {
        let mut file = File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        file.write_all(contents)
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        file.sync_all().map_err(|e| StoreError::io(&tmp_path, e))?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::io(path, err));
    }

    sync_parent_dir(path)
}

/// Copies `from` to `to`, creating the destination directory if needed.
///
/// Errors name whichever side failed: `from` while reading, `to` while
/// writing.
pub(crate) fn copy_file(from: &Path, to: &Path) -> StoreResult<()> {
    let contents = fs::read(from).map_err(|e| StoreError::io(from, e))?;
    ensure_parent_dir(to)?;
    let mut file = File::create(to).map_err(|e| StoreError::io(to, e))?;
    file.write_all(&contents)
        .map_err(|e| StoreError::io(to, e))?;
    file.sync_all().map_err(|e| StoreError::io(to, e))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent).map_err(|e| StoreError::io(parent, e))?;
            dir.sync_all().map_err(|e| StoreError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> StoreResult<()> {
    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}", Uuid::new_v4().simple()));
    PathBuf::from(tmp)
}
