//! Filesystem primitives for Wit
//!
//! Small, stateless helpers the repository engine builds on. Every function
//! operates on the paths it is given and retains nothing between calls.
//!
//! ## Categories of Utilities
//!
//! ### Directory Management
//! - Idempotent directory creation (optionally hidden on Windows)
//! - Removal of empty directories, deepest first
//!
//! ### File Operations
//! - Copy with parent-directory creation
//! - Delete that tolerates an absent file
//! - Atomic file writing for metadata
//!
//! ### Path Manipulation
//! - Converting absolute paths to root-relative paths
//! - Lexical normalization that refuses to escape the root
//!
//! ## Error Handling
//!
//! Primitives report failures as [`WitError::FileIo`] carrying the offending
//! path; the engine wraps them into storage errors where the operation
//! demands it.

use crate::error::{Result, WitError};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Create a directory and any missing parents
///
/// Idempotent: an existing directory is not an error. When `hidden` is set
/// the directory is marked hidden on platforms that have such an attribute
/// (on Unix the leading dot of `.wit` already hides it).
///
/// # Returns
///
/// `true` if the directory was created by this call.
///
/// # Errors
///
/// - [`WitError::FileIo`] if the directory cannot be created, or if a
///   non-directory already occupies the path
pub fn create_directory(path: &Path, hidden: bool) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| WitError::file_io(path, e))?;
    if hidden {
        hide_path(path);
    }
    trace!("Created directory: {:?}", path);
    Ok(true)
}

/// Mark a path hidden (Windows)
#[cfg(windows)]
fn hide_path(path: &Path) {
    let status = std::process::Command::new("attrib")
        .arg("+h")
        .arg(path)
        .status();
    if let Err(e) = status {
        tracing::warn!("Failed to hide {:?}: {}", path, e);
    }
}

/// Mark a path hidden (no-op on Unix, dot-prefixed names are already hidden)
#[cfg(not(windows))]
fn hide_path(_path: &Path) {}

/// Copy a file, creating the destination's parent directories
///
/// Overwrites `dst` if it exists.
///
/// # Returns
///
/// Number of bytes copied.
///
/// # Errors
///
/// - [`WitError::FileIo`] on `src` if it does not exist or is not a file
/// - [`WitError::FileIo`] on `dst` if it cannot be written
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    if !src.is_file() {
        return Err(WitError::file_io(
            src,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source file does not exist"),
        ));
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| WitError::file_io(parent, e))?;
    }
    let bytes = fs::copy(src, dst).map_err(|e| WitError::file_io(dst, e))?;
    trace!("Copied {:?} -> {:?} ({} bytes)", src, dst, bytes);
    Ok(bytes)
}

/// Delete a file
///
/// A missing file is a no-op.
///
/// # Returns
///
/// `true` if a file was removed.
///
/// # Errors
///
/// - [`WitError::FileIo`] on permission or other I/O failures
pub fn delete_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            trace!("Deleted file: {:?}", path);
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(WitError::file_io(path, e)),
    }
}

/// Remove directory if empty
pub fn remove_dir_if_empty(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let is_empty = fs::read_dir(path)
        .map_err(|e| WitError::file_io(path, e))?
        .next()
        .is_none();
    if is_empty {
        fs::remove_dir(path).map_err(|e| WitError::file_io(path, e))?;
        trace!("Removed empty directory: {:?}", path);
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Remove every directory under `root` that is left empty, deepest first
///
/// `root` itself is never removed. Directories that become empty because
/// their only children were empty directories are removed in the same pass.
///
/// # Returns
///
/// Number of directories removed.
pub fn prune_empty_directories(root: &Path) -> Result<usize> {
    if !root.is_dir() {
        return Ok(0);
    }

    let mut dirs = Vec::new();
    for entry in walkdir::WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    // Sort deepest first
    dirs.sort_by(|a, b| b.components().count().cmp(&a.components().count()));

    let mut removed = 0;
    for dir in dirs {
        if remove_dir_if_empty(&dir)? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Make a path relative to a base path
///
/// Tries a lexical strip first so symbolic links in the path are kept as
/// written, then falls back to comparing canonical forms.
///
/// # Errors
///
/// - [`WitError::PathOutsideRepository`] if the path is not under the base
pub fn make_relative(path: &Path, base: &Path) -> Result<PathBuf> {
    if let Ok(relative) = path.strip_prefix(base) {
        return Ok(relative.to_path_buf());
    }

    let path_canon = path
        .canonicalize()
        .map_err(|_| WitError::PathOutsideRepository(path.to_path_buf()))?;
    let base_canon = base.canonicalize().map_err(|e| WitError::file_io(base, e))?;

    path_canon
        .strip_prefix(&base_canon)
        .map(|p| p.to_path_buf())
        .map_err(|_| WitError::PathOutsideRepository(path.to_path_buf()))
}

/// Lexically normalize a relative path, refusing to climb above its root
///
/// `.` segments are dropped and `..` pops the previous segment. Returns
/// `None` for absolute paths or paths whose `..` segments escape the root.
///
/// ```rust
/// use wit::utils::normalize_relative;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_relative(Path::new("./src/../lib.rs")), Some(PathBuf::from("lib.rs")));
/// assert_eq!(normalize_relative(Path::new("../outside")), None);
/// ```
pub fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(segment) => normalized.push(segment),
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}

/// Format bytes in human-readable form
///
/// ```rust
/// use wit::utils::format_bytes;
///
/// assert_eq!(format_bytes(1023), "1023 B");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Atomic file write (write to temp file then rename)
///
/// The temporary file is created next to the target so the rename never
/// crosses filesystems; it is removed automatically if any step fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| WitError::internal(format!("{:?} has no parent directory", path)))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| WitError::file_io(parent, e))?;
    temp.write_all(content).map_err(|e| WitError::file_io(temp.path(), e))?;
    temp.as_file().sync_all().map_err(|e| WitError::file_io(temp.path(), e))?;
    temp.persist(path).map_err(|e| WitError::file_io(path, e.error))?;

    Ok(())
}
