//! # Wit - Minimal local version control
//!
//! A small version-control library that stages files, commits full directory
//! snapshots under a message, lists history and restores earlier snapshots.
//!
//! ## Overview
//!
//! Wit provides a Git-like workflow for a single working directory, allowing you to:
//! - Stage individual files, directories or the whole tree
//! - Commit the staging area as an immutable, self-contained snapshot
//! - List commits oldest first from an append-only ledger
//! - Compare the staging area, last commit and working directory
//! - Check out any earlier snapshot as a full-tree restore
//!
//! ## Architecture
//!
//! Everything lives in a `.wit/` directory at the repository root:
//!
//! - **Snapshot Store**: one directory per commit, holding every tracked file as of
//!   that commit. Unchanged files are carried forward from the parent snapshot, so
//!   each snapshot can be restored on its own
//! - **Staging Area**: a scratch tree of files added but not yet committed
//! - **Ledger**: an append-only JSON Lines file of commit records, guarded by an
//!   advisory lock while writing
//! - **Ignore Policy**: an immutable rule set keeping metadata, OS artifacts,
//!   lock files and temp files out of every snapshot
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wit::Wit;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize a repository in an existing directory
//! let (wit, _) = Wit::init(PathBuf::from("./my_project"))?;
//!
//! // Stage and commit
//! wit.add("src")?;
//! let first = wit.commit("Initial import")?;
//! println!("Created commit {}", first.commit.short_id());
//!
//! // Make some changes, stage everything, commit again
//! wit.add_all()?;
//! wit.commit("Second pass")?;
//!
//! // Restore the first snapshot
//! let result = wit.checkout(&first.commit.id)?;
//! println!("Restored {} files", result.files_restored);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust,no_run
//! use wit::WitBuilder;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (wit, _) = WitBuilder::new()
//!     .reject_duplicate_messages(true)
//!     .ignore_patterns(vec!["*.log".to_string(), "target/**".to_string()])
//!     .init(PathBuf::from("./project"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Snapshots
//!
//! A snapshot is the parent snapshot's files, minus anything now ignored,
//! overlaid with every staged file. The first commit uses the working
//! directory as its parent. Snapshots are never modified after the commit
//! that created them; storage is deliberately not shared between them.
//!
//! ### Status
//!
//! Status compares path sets only. A path is *staged*, *committed* (known to
//! the last snapshot), or *untracked* (in the working directory but neither
//! staged nor committed). File contents are never diffed.
//!
//! ### Checkout
//!
//! Checkout deletes eligible working files the snapshot lacks, then copies
//! every snapshot file into place. It is not transactional: a failure stops
//! the restore at the first error.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, WitError>`. Operations on an
//! uninitialized directory fail with [`WitError::NotARepository`] and do
//! nothing; [`WitError::user_message`] gives a hint suitable for a CLI.
//!
//! ## Module Organization
//!
//! - [`wit`]: The repository engine
//! - [`commit`]: Commit records and identifiers
//! - [`ledger`]: The append-only commit ledger
//! - [`storage`]: The `.wit/` layout and snapshot directories
//! - [`ignore`]: Path selection policy
//! - [`file_tracking`]: Recursive file enumeration
//! - [`utils`]: Filesystem primitives
//! - [`types`]: Configuration and result types
//! - [`error`]: Error types and handling

// Public API modules
pub mod commit;
pub mod error;
pub mod file_tracking;
pub mod ignore;
pub mod ledger;
pub mod storage;
pub mod types;
pub mod utils;
pub mod wit;

// Re-export main types for convenience
pub use commit::Commit;
pub use error::{Result, WitError};
pub use ignore::{IgnorePolicy, IgnoreRules};
pub use ledger::Ledger;
pub use storage::SnapshotStore;
pub use types::*;
pub use wit::{Wit, WitBuilder};
