//! Main Wit implementation
//!
//! This module provides the [`Wit`] struct, the repository engine behind
//! every user-facing operation: staging files, committing snapshots,
//! listing history, computing status and checking out earlier snapshots.
//!
//! ## Overview
//!
//! `Wit` coordinates the lower-level components:
//!
//! - **Ignore Policy**: decides which paths are eligible for tracking
//! - **File Tracker**: enumerates the working directory, staging area and snapshots
//! - **Snapshot Store**: owns the `.wit/` layout and snapshot directories
//! - **Ledger**: the append-only record of commits
//!
//! ## Commit Semantics
//!
//! Every commit materializes a complete snapshot. The new snapshot is the
//! parent snapshot's files (minus anything the ignore policy now rejects)
//! overlaid with every staged file, staged content winning on collisions.
//! The first commit uses the working directory as its parent. The ledger is
//! appended only after the snapshot is fully written, so no ledger entry
//! ever refers to a partial snapshot.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use wit::Wit;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (wit, _) = Wit::init(PathBuf::from("./my_project"))?;
//!
//! wit.add("README.md")?;
//! let summary = wit.commit("Add README")?;
//!
//! // Later, go back to that state
//! wit.checkout(&summary.commit.id)?;
//! # Ok(())
//! # }
//! ```

use crate::commit::Commit;
use crate::error::{Result, WitError};
use crate::file_tracking::FileTracker;
use crate::ignore::IgnorePolicy;
use crate::ledger::Ledger;
use crate::storage::SnapshotStore;
use crate::types::*;
use crate::utils;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// Repository engine for a single working directory
///
/// A `Wit` value is a handle; it caches only the repository configuration
/// and the ignore policy built from it. All repository state lives on disk
/// and is re-read by every operation.
///
/// # Examples
///
/// ```rust,no_run
/// use wit::{Wit, WitBuilder};
/// use std::path::PathBuf;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Open a repository created earlier by `wit init`
/// let wit = Wit::open(PathBuf::from("./project"))?;
///
/// // Or create one that rejects duplicate commit messages
/// let (wit, _) = WitBuilder::new()
///     .reject_duplicate_messages(true)
///     .init(PathBuf::from("./other_project"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Wit {
    /// Root of the working directory
    root_path: PathBuf,
    /// `.wit/` layout
    store: SnapshotStore,
    /// Commit ledger
    ledger: Ledger,
    /// Repository configuration
    config: WitConfig,
    /// Policy built from the configuration
    policy: Arc<IgnorePolicy>,
}

impl Wit {
    /// Initialize a repository with default settings
    ///
    /// Equivalent to `WitBuilder::new().init(root_path)`.
    pub fn init(root_path: PathBuf) -> Result<(Self, InitOutcome)> {
        WitBuilder::new().init(root_path)
    }

    /// Open an existing repository
    ///
    /// A missing `config.json` falls back to the default configuration.
    ///
    /// # Errors
    ///
    /// - [`WitError::NotARepository`] if `root_path` has no `.wit/` directory
    /// - [`WitError::InvalidPattern`] if the stored ignore patterns do not compile
    #[instrument]
    pub fn open(root_path: PathBuf) -> Result<Self> {
        let store = SnapshotStore::new(&root_path);
        if !store.is_initialized() {
            return Err(WitError::NotARepository(root_path));
        }

        let config = match store.read_metadata()? {
            Some(metadata) => metadata.config,
            None => {
                debug!("No config.json found, using defaults");
                WitConfig::default()
            }
        };
        let policy = build_policy(&config)?;
        let ledger = store.ledger();

        debug!("Opened repository at {:?}", root_path);
        Ok(Self {
            root_path,
            store,
            ledger,
            config,
            policy: Arc::new(policy),
        })
    }

    /// Root of the working directory
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Repository configuration
    pub fn config(&self) -> &WitConfig {
        &self.config
    }

    /// Ignore policy in effect
    pub fn policy(&self) -> &IgnorePolicy {
        &self.policy
    }

    /// The `.wit/` layout
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Stage a file, or every eligible file under a directory
    ///
    /// `name` is resolved against the repository root unless absolute. A
    /// single ignored file is counted in [`AddReport::ignored`] and not
    /// copied. For a directory, a file that fails to copy is recorded in
    /// [`AddReport::failed`] and the rest continue. Naming the root itself
    /// behaves like [`Wit::add_all`].
    ///
    /// # Errors
    ///
    /// - [`WitError::NotARepository`] if the repository is not initialized
    /// - [`WitError::PathNotFound`] if `name` does not exist
    /// - [`WitError::PathOutsideRepository`] if `name` resolves outside the root
    /// - [`WitError::FileIo`] if a single named file cannot be copied
    #[instrument(skip(self))]
    pub fn add<P: AsRef<Path> + Debug>(&self, name: P) -> Result<AddReport> {
        self.require_init()?;
        let name = name.as_ref();

        let target = if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.root_path.join(name)
        };
        let file_type = match fs::symlink_metadata(&target) {
            Ok(metadata) => metadata.file_type(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(WitError::PathNotFound(name.to_path_buf()))
            }
            Err(e) => return Err(WitError::file_io(&target, e)),
        };

        let relative = utils::make_relative(&target, &self.root_path)?;
        let relative = utils::normalize_relative(&relative)
            .ok_or_else(|| WitError::PathOutsideRepository(name.to_path_buf()))?;

        if file_type.is_dir() {
            return self.stage_tree(&relative);
        }

        let mut report = AddReport::default();
        if !file_type.is_file() || self.policy.should_ignore(&relative) {
            debug!("Skipping {:?}", relative);
            report.ignored += 1;
            return Ok(report);
        }

        report.bytes_staged = self.stage_file(&relative)?;
        report.staged.push(relative);
        Ok(report)
    }

    /// Stage every eligible file in the working directory
    #[instrument(skip(self))]
    pub fn add_all(&self) -> Result<AddReport> {
        self.require_init()?;
        self.stage_tree(Path::new(""))
    }

    /// Commit the staging area as a new snapshot
    ///
    /// # Errors
    ///
    /// - [`WitError::NotARepository`] if the repository is not initialized
    /// - [`WitError::NothingToCommit`] if nothing is staged
    /// - [`WitError::DuplicateMessage`] if the message exists and duplicates are rejected
    /// - [`WitError::Storage`] if the snapshot or ledger cannot be written; the
    ///   ledger and staging area are left unchanged
    #[instrument(skip(self))]
    pub fn commit(&self, message: &str) -> Result<CommitSummary> {
        self.require_init()?;

        let staging_dir = self.store.staging_dir();
        let staged = self.tracker(&staging_dir).tracked_files()?;
        if staged.is_empty() {
            return Err(WitError::NothingToCommit);
        }

        if self.config.reject_duplicate_messages && self.ledger.contains_message(message)? {
            return Err(WitError::DuplicateMessage(message.to_string()));
        }

        let history = self.ledger.read_all()?;

        let parent = history.last();
        let parent_files = match parent {
            Some(parent) => match self.store.snapshot_dir(&parent.id).filter(|dir| dir.is_dir()) {
                Some(dir) => self.tracker(&dir).tracked_files()?,
                None => {
                    warn!("Snapshot for last commit {} is missing, carrying nothing forward", parent.id);
                    BTreeSet::new()
                }
            },
            None => self.tracker(&self.root_path).tracked_files()?,
        };
        let parent_root = match parent {
            Some(parent) => self.store.snapshot_dir(&parent.id).unwrap_or_default(),
            None => self.root_path.clone(),
        };

        let taken: HashSet<&str> = history.iter().map(|c| c.id.as_str()).collect();
        let commit = Commit::new_unique(message, |id| {
            taken.contains(id) || self.store.snapshot_exists(id)
        });
        debug!(
            "Committing {} staged files as {} (parent {:?})",
            staged.len(),
            commit.id,
            parent.map(|p| p.id.as_str())
        );

        let snapshot_dir = self.store.create_snapshot(&commit.id)?;
        let snapshot_files = match self.materialize(&snapshot_dir, &parent_root, &parent_files, &staged) {
            Ok(count) => count,
            Err(e) => {
                self.discard_snapshot(&commit.id);
                return Err(WitError::storage_with(
                    format!("failed to write snapshot {}", commit.id),
                    e,
                ));
            }
        };

        if let Err(e) = self.ledger.append(&commit) {
            self.discard_snapshot(&commit.id);
            return Err(e);
        }

        let mut warnings = Vec::new();
        if let Err(e) = self.clear_staging() {
            warn!("Failed to clear staging area: {}", e);
            warnings.push(format!("staging area was not fully cleared: {}", e));
        }

        let insertions = match parent {
            Some(_) => staged.difference(&parent_files).count(),
            None => staged.len(),
        };

        info!(
            "Created commit {} with {} files ({} staged, {} new)",
            commit.short_id(),
            snapshot_files,
            staged.len(),
            insertions
        );

        Ok(CommitSummary {
            parent_id: parent.map(|p| p.id.clone()),
            commit,
            files_staged: staged.len(),
            insertions,
            snapshot_files,
            warnings,
        })
    }

    /// Every commit, oldest first
    #[instrument(skip(self))]
    pub fn log(&self) -> Result<Vec<Commit>> {
        self.require_init()?;
        self.ledger.read_all()
    }

    /// Compare the staging area, the last snapshot and the working directory
    ///
    /// Paths are compared by name only; file contents are never read.
    #[instrument(skip(self))]
    pub fn status(&self) -> Result<StatusReport> {
        self.require_init()?;

        let staged = self.tracker(&self.store.staging_dir()).tracked_files()?;
        let last_commit = self.ledger.read_last()?;
        let committed = match &last_commit {
            Some(commit) => match self.store.snapshot_dir(&commit.id) {
                Some(dir) => self.tracker(&dir).tracked_files()?,
                None => BTreeSet::new(),
            },
            None => BTreeSet::new(),
        };
        let working = self.tracker(&self.root_path).tracked_files()?;

        let untracked = working
            .iter()
            .filter(|path| !staged.contains(*path) && !committed.contains(*path))
            .cloned()
            .collect();
        let modified = staged.intersection(&committed).cloned().collect();

        Ok(StatusReport {
            last_commit,
            staged,
            committed,
            working,
            untracked,
            modified,
        })
    }

    /// Restore the working directory to a snapshot
    ///
    /// Eligible working files absent from the snapshot are deleted, then
    /// every snapshot file is copied over the working directory. The
    /// operation is not transactional: the first failure stops it and
    /// leaves the working directory partly restored.
    ///
    /// # Errors
    ///
    /// - [`WitError::NotARepository`] if the repository is not initialized
    /// - [`WitError::UnknownCommit`] if no snapshot exists for `commit_id`
    /// - [`WitError::FileIo`] for the first delete or copy that fails
    #[instrument(skip(self))]
    pub fn checkout(&self, commit_id: &str) -> Result<CheckoutResult> {
        self.require_init()?;
        let snapshot_dir = self
            .store
            .snapshot_dir(commit_id)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| WitError::UnknownCommit(commit_id.to_string()))?;

        info!("Checking out {}", commit_id);
        let start = Instant::now();

        let target = self.tracker(&snapshot_dir).tracked_files()?;
        let working = self.tracker(&self.root_path).tracked_files()?;

        let mut files_deleted = 0;
        let mut emptied_dirs = BTreeSet::new();
        for path in working.difference(&target) {
            let full_path = self.root_path.join(path);
            if utils::delete_file(&full_path)? {
                files_deleted += 1;
                trace!("Deleted {:?}", path);
            }
            let mut parent = path.parent();
            while let Some(dir) = parent.filter(|dir| !dir.as_os_str().is_empty()) {
                emptied_dirs.insert(dir.to_path_buf());
                parent = dir.parent();
            }
        }

        // Deepest first so parents see their children gone
        let mut emptied_dirs: Vec<_> = emptied_dirs.into_iter().collect();
        emptied_dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
        for dir in emptied_dirs {
            utils::remove_dir_if_empty(&self.root_path.join(dir))?;
        }

        let mut bytes_written = 0;
        for path in &target {
            bytes_written += utils::copy_file(&snapshot_dir.join(path), &self.root_path.join(path))?;
            trace!("Restored {:?}", path);
        }

        let result = CheckoutResult {
            commit_id: commit_id.to_string(),
            files_restored: target.len(),
            files_deleted,
            bytes_written,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Checked out {}: {} files restored, {} deleted",
            commit_id, result.files_restored, result.files_deleted
        );
        Ok(result)
    }

    /// Resolve a full identifier or a unique identifier prefix
    ///
    /// # Errors
    ///
    /// - [`WitError::UnknownCommit`] if nothing matches
    /// - [`WitError::AmbiguousCommit`] if the prefix matches several commits
    pub fn resolve_commit(&self, prefix: &str) -> Result<Commit> {
        self.require_init()?;
        if prefix.is_empty() {
            return Err(WitError::UnknownCommit(prefix.to_string()));
        }

        if let Some(commit) = self.ledger.find_by_id(prefix)? {
            return Ok(commit);
        }

        let mut matches = self.ledger.find_by_prefix(prefix)?;
        match matches.len() {
            0 => Err(WitError::UnknownCommit(prefix.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(WitError::AmbiguousCommit {
                prefix: prefix.to_string(),
                matches: n,
            }),
        }
    }

    /// Root-relative paths of every file in a snapshot
    pub fn snapshot_files(&self, commit_id: &str) -> Result<Vec<PathBuf>> {
        self.require_init()?;
        let dir = self
            .store
            .snapshot_dir(commit_id)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| WitError::UnknownCommit(commit_id.to_string()))?;
        self.tracker(&dir).list_files(&ScanOptions::all())
    }

    /// Bytes of one file in a snapshot
    ///
    /// # Errors
    ///
    /// - [`WitError::UnknownCommit`] if the snapshot does not exist
    /// - [`WitError::PathOutsideRepository`] if `path` climbs out of the snapshot
    /// - [`WitError::PathNotFound`] if the snapshot has no such file
    pub fn read_snapshot_file(&self, commit_id: &str, path: &Path) -> Result<Vec<u8>> {
        self.require_init()?;
        let dir = self
            .store
            .snapshot_dir(commit_id)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| WitError::UnknownCommit(commit_id.to_string()))?;
        let relative = utils::normalize_relative(path)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| WitError::PathOutsideRepository(path.to_path_buf()))?;

        let full_path = dir.join(&relative);
        match fs::read(&full_path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(WitError::PathNotFound(relative)),
            Err(e) => Err(WitError::file_io(full_path, e)),
        }
    }

    /// Remove snapshot directories no ledger entry references
    ///
    /// Such directories are left behind by a commit that failed after the
    /// snapshot was created and whose immediate cleanup also failed. With
    /// `dry_run` the orphans are reported but kept.
    #[instrument(skip(self))]
    pub fn gc(&self, dry_run: bool) -> Result<GcStats> {
        self.require_init()?;
        info!("Starting garbage collection");
        let start = Instant::now();

        let referenced: HashSet<String> = self.ledger.read_all()?.into_iter().map(|c| c.id).collect();
        let snapshots = self.store.list_snapshots()?;

        let mut stats = GcStats {
            snapshots_examined: snapshots.len(),
            ..Default::default()
        };

        for id in snapshots.into_iter().filter(|id| !referenced.contains(id)) {
            let size = self.store.snapshot_size(&id).unwrap_or(0);
            if !dry_run {
                match self.store.remove_snapshot(&id) {
                    Ok(()) => {
                        stats.snapshots_deleted += 1;
                        stats.bytes_reclaimed += size;
                    }
                    Err(e) => warn!("Failed to remove orphaned snapshot {}: {}", id, e),
                }
            } else {
                stats.bytes_reclaimed += size;
            }
            stats.orphaned.push(id);
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Garbage collection complete in {}ms: {} orphaned, {} removed",
            stats.duration_ms,
            stats.orphaned.len(),
            stats.snapshots_deleted
        );
        Ok(stats)
    }

    fn require_init(&self) -> Result<()> {
        if self.store.is_initialized() {
            Ok(())
        } else {
            Err(WitError::NotARepository(self.root_path.clone()))
        }
    }

    fn tracker(&self, root: &Path) -> FileTracker {
        FileTracker::new(root.to_path_buf(), Arc::clone(&self.policy))
    }

    fn stage_file(&self, relative: &Path) -> Result<u64> {
        let staging_dir = self.store.staging_dir();
        self.clear_staged_conflicts(&staging_dir, relative)?;
        let bytes = utils::copy_file(&self.root_path.join(relative), &staging_dir.join(relative))?;
        trace!("Staged {:?}", relative);
        Ok(bytes)
    }

    /// Drop staged entries that would clash with `relative` as file vs directory
    ///
    /// A staged file at one of its ancestors, or a staged directory at the
    /// path itself, is left over from before the path changed kind.
    fn clear_staged_conflicts(&self, staging_dir: &Path, relative: &Path) -> Result<()> {
        for ancestor in relative.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            let staged = staging_dir.join(ancestor);
            if staged.is_file() {
                utils::delete_file(&staged)?;
                debug!("Unstaged {:?}, now a directory", ancestor);
            }
        }

        let staged = staging_dir.join(relative);
        if staged.is_dir() {
            fs::remove_dir_all(&staged).map_err(|e| WitError::file_io(&staged, e))?;
            debug!("Unstaged directory {:?}, now a file", relative);
        }
        Ok(())
    }

    /// Stage every eligible file under `relative_dir` (empty for the root)
    fn stage_tree(&self, relative_dir: &Path) -> Result<AddReport> {
        let mut report = AddReport::default();
        let candidates = self
            .tracker(&self.root_path.join(relative_dir))
            .list_files(&ScanOptions::default())?;

        for file in candidates {
            let relative = relative_dir.join(file);
            if self.policy.should_ignore(&relative) {
                report.ignored += 1;
                continue;
            }
            match self.stage_file(&relative) {
                Ok(bytes) => {
                    report.bytes_staged += bytes;
                    report.staged.push(relative);
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", relative, e);
                    report.failed.push((relative, e.to_string()));
                }
            }
        }

        debug!(
            "Staged {} files under {:?} ({} ignored, {} failed)",
            report.staged.len(),
            relative_dir,
            report.ignored,
            report.failed.len()
        );
        Ok(report)
    }

    /// Carry forward unstaged parent files, then overlay staged files
    ///
    /// A parent path that is an ancestor or descendant of a staged path has
    /// changed between file and directory; the staged form replaces it.
    fn materialize(
        &self,
        snapshot_dir: &Path,
        parent_root: &Path,
        parent_files: &BTreeSet<PathBuf>,
        staged: &BTreeSet<PathBuf>,
    ) -> Result<usize> {
        let staging_dir = self.store.staging_dir();

        let mut carried = 0;
        for path in parent_files.difference(staged) {
            if shadowed_by_staged(path, staged) {
                trace!("Not carrying {:?}, replaced by a staged path", path);
                continue;
            }
            utils::copy_file(&parent_root.join(path), &snapshot_dir.join(path))?;
            carried += 1;
        }
        for path in staged {
            utils::copy_file(&staging_dir.join(path), &snapshot_dir.join(path))?;
        }

        debug!("Snapshot written: {} carried forward, {} staged", carried, staged.len());
        Ok(carried + staged.len())
    }

    fn discard_snapshot(&self, id: &str) {
        match self.store.remove_snapshot(id) {
            Ok(()) => debug!("Removed incomplete snapshot {}", id),
            Err(e) => warn!("Failed to remove incomplete snapshot {}: {}", id, e),
        }
    }

    fn clear_staging(&self) -> Result<()> {
        let staging_dir = self.store.staging_dir();
        let files = FileTracker::new(staging_dir.clone(), Arc::clone(&self.policy))
            .list_files(&ScanOptions::all())?;
        for file in files {
            utils::delete_file(&staging_dir.join(file))?;
        }
        utils::prune_empty_directories(&staging_dir)?;
        Ok(())
    }
}

/// Whether a staged path sits strictly above or below `path`
fn shadowed_by_staged(path: &Path, staged: &BTreeSet<PathBuf>) -> bool {
    let staged_ancestor = path
        .ancestors()
        .skip(1)
        .take_while(|ancestor| !ancestor.as_os_str().is_empty())
        .any(|ancestor| staged.contains(ancestor));

    // Descendants sort directly after their ancestor
    let staged_descendant = staged
        .range::<Path, _>((Bound::Excluded(path), Bound::Unbounded))
        .next()
        .is_some_and(|next| next.starts_with(path));

    staged_ancestor || staged_descendant
}

/// Builder for initializing a repository with custom settings
///
/// Settings only apply when `init` creates a new repository. Initializing
/// an existing repository keeps its stored configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use wit::WitBuilder;
/// use std::path::PathBuf;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (wit, outcome) = WitBuilder::new()
///     .ignore_patterns(vec!["*.log".to_string(), "target/**".to_string()])
///     .results_dir("reports")
///     .init(PathBuf::from("./my_project"))?;
/// # Ok(())
/// # }
/// ```
///
/// # Default Values
///
/// - `reject_duplicate_messages`: false
/// - `ignore_patterns`: empty (built-in rules always apply)
/// - `results_dir`: `.wit_results`
#[derive(Debug, Default)]
pub struct WitBuilder {
    config: WitConfig,
}

impl WitBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject commits whose message already appears in history
    pub fn reject_duplicate_messages(mut self, reject: bool) -> Self {
        self.config.reject_duplicate_messages = reject;
        self
    }

    /// Extra glob patterns excluded from tracking
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.ignore_patterns = patterns;
        self
    }

    /// Name of the results directory excluded from tracking
    pub fn results_dir(mut self, name: impl Into<String>) -> Self {
        self.config.results_dir = name.into();
        self
    }

    /// Create (or re-initialize) the repository at `root_path`
    ///
    /// Re-initializing never touches existing history, staging or settings.
    ///
    /// # Errors
    ///
    /// - [`WitError::PathNotFound`] if `root_path` is not a directory
    /// - [`WitError::InvalidPattern`] if an ignore pattern does not compile
    #[instrument(skip(self))]
    pub fn init(self, root_path: PathBuf) -> Result<(Wit, InitOutcome)> {
        if !root_path.is_dir() {
            return Err(WitError::PathNotFound(root_path));
        }
        build_policy(&self.config)?;

        let store = SnapshotStore::new(&root_path);
        let outcome = store.create_layout(&RepositoryMetadata::new(self.config))?;
        match outcome {
            InitOutcome::Created => info!("Initialized empty wit repository in {:?}", store.metadata_dir()),
            InitOutcome::Reinitialized => warn!(
                "Reinitialized existing wit repository in {:?}, history and settings kept",
                store.metadata_dir()
            ),
        }

        Ok((Wit::open(root_path)?, outcome))
    }
}

fn build_policy(config: &WitConfig) -> Result<IgnorePolicy> {
    IgnorePolicy::default()
        .with_results_dir(Some(config.results_dir.clone()))
        .with_patterns(config.ignore_patterns.clone())
}
