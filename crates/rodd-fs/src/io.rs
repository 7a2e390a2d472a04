//! Atomic writes for generated artifacts and catalog directory listing

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Write content atomically to a file with locking.
///
/// The content goes to a hidden temp file next to `path` which is then
/// renamed over it, so a rendered artifact is never observed half-written.
/// The temp file is removed again if any step fails.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();

    // Destination directories are created on demand
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = target.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    let result = write_locked(&temp_path, &target, content)
        .and_then(|()| fs::rename(&temp_path, &target).map_err(|e| Error::io(&target, e)));

    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
        }
    }
    result
}

/// Write and flush `content` into `temp_path` while holding an exclusive lock.
fn write_locked(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    let lock_failed = |_| Error::LockFailed {
        path: target.to_path_buf(),
    };
    file.lock_exclusive().map_err(lock_failed)?;

    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(temp_path, e))?;

    // Explicit so a failed unlock is reported rather than lost on drop
    file.unlock().map_err(lock_failed)
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// List the regular files directly inside `dir` whose extension is `extension`.
///
/// Results are sorted by path so callers get the same order on every run.
/// A missing directory yields an empty list.
pub fn list_files(dir: &NormalizedPath, extension: &str) -> Result<Vec<NormalizedPath>> {
    if !dir.is_dir() {
        tracing::debug!(%dir, "Directory does not exist, nothing to list");
        return Ok(Vec::new());
    }

    let native_dir = dir.to_native();
    let entries = fs::read_dir(&native_dir)
        .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| Error::io(&native_dir, e))?;

    let mut files: Vec<NormalizedPath> = entries
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .map(|path| dir.join(&path.file_name().unwrap_or_default().to_string_lossy()))
        .collect();

    files.sort();
    Ok(files)
}

/// Whether `dir` directly contains at least one file with the given extension.
pub fn contains_files_with_extension(dir: &NormalizedPath, extension: &str) -> Result<bool> {
    Ok(!list_files(dir, extension)?.is_empty())
}
