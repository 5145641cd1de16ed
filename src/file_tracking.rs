//! File enumeration for Wit
//!
//! This module walks a directory tree and produces the root-relative paths
//! of the regular files beneath it. The same walker enumerates the working
//! directory, the staging area and snapshot directories, so every set
//! comparison the engine makes is between paths of the same shape.
//!
//! ## Scan Options
//!
//! [`ScanOptions`] controls whether the repository's own metadata directory
//! and the designated results directory are descended into. Both are skipped
//! by default. Applying the full [`IgnorePolicy`] is a separate step
//! ([`FileTracker::tracked_files`]) because snapshot construction and
//! checkout need to see, and then decide about, every file.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wit::file_tracking::FileTracker;
//! use wit::ignore::IgnorePolicy;
//! use wit::types::ScanOptions;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = FileTracker::new(PathBuf::from("./my_project"), Arc::new(IgnorePolicy::default()));
//!
//! let everything = tracker.list_files(&ScanOptions::default())?;
//! let tracked = tracker.tracked_files()?;
//! println!("{} files, {} eligible for tracking", everything.len(), tracked.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Symbolic Links
//!
//! Links are neither followed nor reported; only regular files are tracked.

use crate::error::Result;
use crate::ignore::{IgnorePolicy, METADATA_DIR};
use crate::types::ScanOptions;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Enumerates files under one root directory
///
/// The listing is materialized and sorted, so it is finite and can be
/// requested again at any time to observe the current state of the tree.
#[derive(Debug, Clone)]
pub struct FileTracker {
    /// Root directory to enumerate
    root_path: PathBuf,
    /// Policy deciding which paths are eligible for tracking
    policy: Arc<IgnorePolicy>,
}

impl FileTracker {
    /// Create a tracker for `root_path` using `policy`
    pub fn new(root_path: PathBuf, policy: Arc<IgnorePolicy>) -> Self {
        Self { root_path, policy }
    }

    /// Root directory this tracker enumerates
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Policy this tracker filters with
    pub fn policy(&self) -> &IgnorePolicy {
        &self.policy
    }

    /// List every regular file under the root, relative to it
    ///
    /// A missing root yields an empty list. The metadata and results
    /// directories are skipped unless `options` asks for them; no other
    /// filtering is applied.
    ///
    /// # Errors
    ///
    /// - [`crate::WitError::WalkDir`] if a directory cannot be read
    pub fn list_files(&self, options: &ScanOptions) -> Result<Vec<PathBuf>> {
        if !self.root_path.is_dir() {
            trace!("Nothing to list, {:?} is not a directory", self.root_path);
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(&self.root_path)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.descend_into(entry, options));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root_path)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.path().to_path_buf());
            files.push(relative);
        }

        files.sort();
        debug!("Listed {} files under {:?}", files.len(), self.root_path);
        Ok(files)
    }

    /// Files under the root that the ignore policy accepts
    pub fn tracked_files(&self) -> Result<BTreeSet<PathBuf>> {
        Ok(self
            .list_files(&ScanOptions::default())?
            .into_iter()
            .filter(|path| !self.policy.should_ignore(path))
            .collect())
    }

    fn descend_into(&self, entry: &DirEntry, options: &ScanOptions) -> bool {
        if !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if !options.include_metadata && name == METADATA_DIR {
            return false;
        }
        if !options.include_results && self.policy.results_dir() == Some(name.as_ref()) {
            return false;
        }
        true
    }
}
