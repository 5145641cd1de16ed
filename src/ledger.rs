//! Append-only commit ledger
//!
//! The ledger is the ordered record of every commit in the repository. It
//! is stored as JSON Lines (`.wit/ledger.jsonl`): one [`Commit`] object per
//! line, in insertion order, which is also chronological order. JSON string
//! escaping takes care of messages containing separators or newlines.
//!
//! ## Durability
//!
//! [`Ledger::append`] opens the file in append mode, so each write costs the
//! same regardless of history length, and holds an exclusive advisory lock
//! (via `fs2`) for the duration of the write. If another writer already
//! holds the lock the append fails immediately with a storage error rather
//! than interleaving records. Entries are never rewritten or removed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wit::commit::Commit;
//! use wit::ledger::Ledger;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = Ledger::new(PathBuf::from(".wit/ledger.jsonl"));
//! ledger.append(&Commit::new("Initial import"))?;
//!
//! for commit in ledger.read_all()? {
//!     println!("{}", commit.oneline());
//! }
//! # Ok(())
//! # }
//! ```

use crate::commit::Commit;
use crate::error::{Result, WitError};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Handle to the ledger file
///
/// The handle holds no in-memory copy of the entries; every read goes to
/// disk so it reflects all prior appends, including those made through
/// another handle.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Create a handle for the ledger file at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty ledger file if none exists
    ///
    /// Existing entries are never truncated.
    pub fn create(&self) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| WitError::storage_with("failed to create ledger", WitError::file_io(&self.path, e)))?;
        Ok(())
    }

    /// Durably append one commit
    ///
    /// # Errors
    ///
    /// - [`WitError::Storage`] if the ledger's directory is missing, the file
    ///   is locked by another writer, or the write fails
    pub fn append(&self, commit: &Commit) -> Result<()> {
        let mut line = serde_json::to_string(commit)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| WitError::storage_with("failed to open ledger", WitError::file_io(&self.path, e)))?;

        file.try_lock_exclusive().map_err(|e| {
            WitError::storage_with(
                "ledger is locked by another writer",
                WitError::file_io(&self.path, e),
            )
        })?;

        let written = file
            .write_all(line.as_bytes())
            .and_then(|_| file.sync_data());
        let unlocked = FileExt::unlock(&file);

        written.map_err(|e| WitError::storage_with("failed to append to ledger", WitError::file_io(&self.path, e)))?;
        if let Err(e) = unlocked {
            trace!("Ledger unlock failed, released on close: {}", e);
        }

        debug!("Appended commit {} to ledger", commit.id);
        Ok(())
    }

    /// Every commit, oldest first
    ///
    /// A missing ledger file reads as empty. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// - [`WitError::CorruptLedger`] if a line cannot be decoded
    pub fn read_all(&self) -> Result<Vec<Commit>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(WitError::file_io(&self.path, e)),
        };

        let mut commits = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| WitError::file_io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let commit: Commit = serde_json::from_str(&line).map_err(|e| WitError::CorruptLedger {
                line: index + 1,
                reason: e.to_string(),
            })?;
            commits.push(commit);
        }

        trace!("Read {} ledger entries", commits.len());
        Ok(commits)
    }

    /// Most recent commit, if any
    pub fn read_last(&self) -> Result<Option<Commit>> {
        Ok(self.read_all()?.pop())
    }

    /// Commit with exactly this identifier
    pub fn find_by_id(&self, id: &str) -> Result<Option<Commit>> {
        Ok(self.read_all()?.into_iter().find(|commit| commit.id == id))
    }

    /// Commits whose identifier starts with `prefix`, oldest first
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Commit>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|commit| commit.id.starts_with(prefix))
            .collect())
    }

    /// Whether any commit carries this exact message
    pub fn contains_message(&self, message: &str) -> Result<bool> {
        Ok(self.read_all()?.iter().any(|commit| commit.message == message))
    }

    /// Whether the ledger has no entries
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read_all()?.is_empty())
    }

    /// Number of entries
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }
}
