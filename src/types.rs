//! Core data types used throughout the Wit library
//!
//! This module contains the plain data structures shared across components.
//!
//! ## Overview
//!
//! The types in this module represent:
//! - **Configuration**: `WitConfig`, `RepositoryMetadata` - persisted repository settings
//! - **Enumeration**: `ScanOptions` - what a directory walk descends into
//! - **Operations**: `AddReport`, `CommitSummary`, `StatusReport`, `CheckoutResult`,
//!   `GcStats`, `InitOutcome` - results of engine operations
//!
//! The engine never prints; callers render these values however they like.
//!
//! ## Examples
//!
//! ```rust
//! use wit::types::WitConfig;
//!
//! let config = WitConfig {
//!     reject_duplicate_messages: true,
//!     ignore_patterns: vec!["*.log".to_string()],
//!     ..Default::default()
//! };
//! assert_eq!(config.results_dir, ".wit_results");
//! ```

use crate::commit::Commit;
use crate::ignore::DEFAULT_RESULTS_DIR;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Current on-disk layout version
pub const FORMAT_VERSION: u32 = 1;

/// Controls which reserved directories a recursive listing descends into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Include the repository metadata directory
    pub include_metadata: bool,
    /// Include the designated results directory
    pub include_results: bool,
}

impl ScanOptions {
    /// Options that descend into every directory
    pub fn all() -> Self {
        Self {
            include_metadata: true,
            include_results: true,
        }
    }
}

/// Configuration for a Wit repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WitConfig {
    /// Reject a commit whose message already appears in the ledger
    pub reject_duplicate_messages: bool,
    /// Extra glob patterns added to the built-in ignore rules
    pub ignore_patterns: Vec<String>,
    /// Designated results directory, never tracked
    pub results_dir: String,
}

impl Default for WitConfig {
    fn default() -> Self {
        Self {
            reject_duplicate_messages: false,
            ignore_patterns: Vec::new(),
            results_dir: DEFAULT_RESULTS_DIR.to_string(),
        }
    }
}

/// Metadata stored in `.wit/config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// Version of the on-disk layout
    pub format_version: u32,
    /// Wit version that created the repository
    pub wit_version: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Configuration
    pub config: WitConfig,
}

impl RepositoryMetadata {
    /// Metadata for a repository created now with `config`
    pub fn new(config: WitConfig) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            wit_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
            config,
        }
    }
}

/// What `init` found at the repository root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitOutcome {
    /// A fresh metadata directory was created
    Created,
    /// The repository already existed; history and settings were left untouched
    Reinitialized,
}

/// Result of staging one path or the whole working directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddReport {
    /// Root-relative paths copied into the staging area
    pub staged: Vec<PathBuf>,
    /// Number of files skipped by the ignore policy
    pub ignored: usize,
    /// Files that could not be copied, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// Total bytes copied into staging
    pub bytes_staged: u64,
}

impl AddReport {
    /// Fold another report into this one
    pub fn merge(&mut self, other: AddReport) {
        self.staged.extend(other.staged);
        self.ignored += other.ignored;
        self.failed.extend(other.failed);
        self.bytes_staged += other.bytes_staged;
    }

    /// Whether every candidate file was copied
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Summary of a successful commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    /// The ledger entry that was appended
    pub commit: Commit,
    /// Parent snapshot identifier (`None` for the first commit)
    pub parent_id: Option<String>,
    /// Number of files that were staged
    pub files_staged: usize,
    /// Staged paths not present in the parent snapshot
    pub insertions: usize,
    /// Total files in the new snapshot
    pub snapshot_files: usize,
    /// Non-fatal problems after the ledger append
    pub warnings: Vec<String>,
}

/// Path sets reported by `status`
///
/// The model distinguishes known paths from unknown paths only; contents
/// are never compared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusReport {
    /// Most recent commit, if any
    pub last_commit: Option<Commit>,
    /// Current staging area contents
    pub staged: BTreeSet<PathBuf>,
    /// File set of the most recent snapshot
    pub committed: BTreeSet<PathBuf>,
    /// Non-ignored files in the working directory
    pub working: BTreeSet<PathBuf>,
    /// `working - staged - committed`
    pub untracked: BTreeSet<PathBuf>,
    /// `staged ∩ committed`
    pub modified: BTreeSet<PathBuf>,
}

impl StatusReport {
    /// Staged paths not yet known to the last commit
    pub fn new_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.staged.difference(&self.committed)
    }

    /// Nothing staged and nothing untracked
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.untracked.is_empty()
    }
}

/// Result of a checkout operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResult {
    /// Commit that was checked out
    pub commit_id: String,
    /// Number of files written from the snapshot
    pub files_restored: usize,
    /// Number of working files deleted because the snapshot lacks them
    pub files_deleted: usize,
    /// Total bytes written
    pub bytes_written: u64,
    /// Time taken in milliseconds
    pub duration_ms: u64,
}

/// Statistics from garbage collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GcStats {
    /// Number of snapshot directories examined
    pub snapshots_examined: usize,
    /// Number of orphaned snapshots removed
    pub snapshots_deleted: usize,
    /// Bytes reclaimed
    pub bytes_reclaimed: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Identifiers of snapshots no ledger entry references
    pub orphaned: Vec<String>,
}
