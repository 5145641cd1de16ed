//! Commit records and identifier allocation
//!
//! A commit is the immutable metadata value stored in the ledger for every
//! snapshot: identifier, message and creation timestamp. The file tree itself
//! lives in the snapshot store under a directory named by the identifier.
//!
//! ## Identifiers
//!
//! Identifiers are the first [`COMMIT_ID_LEN`] hex characters of the SHA-256
//! of `"{timestamp}_{message}"`. When the candidate collides with an existing
//! identifier, a numeric nonce is appended to the hash input until a free
//! identifier is found, so uniqueness within a ledger is guaranteed by
//! construction.
//!
//! ## Examples
//!
//! ```rust
//! use wit::commit::Commit;
//!
//! let commit = Commit::new("Initial import");
//! assert_eq!(commit.id.len(), wit::commit::COMMIT_ID_LEN);
//! println!("{}", commit.short_id());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hex characters in a commit identifier
pub const COMMIT_ID_LEN: usize = 10;

/// Number of characters shown by [`Commit::short_id`]
const SHORT_ID_LEN: usize = 7;

/// Represents one entry of the commit ledger
///
/// Created once at commit time and never mutated afterwards. Hash lookups
/// and log listing read it back verbatim.
///
/// # Examples
///
/// ```rust
/// use wit::commit::Commit;
///
/// let commit = Commit::new("Fix typo in README");
/// assert_eq!(commit.message, "Fix typo in README");
/// assert!(commit.timestamp <= chrono::Utc::now());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Unique identifier, also the snapshot directory name
    pub id: String,
    /// User-provided commit message
    pub message: String,
    /// Creation timestamp (RFC 3339 on disk)
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    /// Create a commit stamped with the current time
    ///
    /// The identifier is derived from the timestamp and message. Use
    /// [`Commit::new_unique`] when the identifier must avoid existing ones.
    pub fn new(message: impl Into<String>) -> Self {
        Self::new_unique(message, |_| false)
    }

    /// Create a commit whose identifier is not rejected by `is_taken`
    ///
    /// Candidates are derived from the timestamp and message; each collision
    /// reported by `is_taken` adds a nonce to the hash input and retries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wit::commit::Commit;
    ///
    /// let first = Commit::new("same message");
    /// let taken = first.id.clone();
    /// let second = Commit::new_unique("same message", |id| id == taken);
    /// assert_ne!(first.id, second.id);
    /// ```
    pub fn new_unique(message: impl Into<String>, is_taken: impl Fn(&str) -> bool) -> Self {
        let message = message.into();
        let timestamp = Utc::now();

        let mut nonce = 0u64;
        let id = loop {
            let candidate = derive_id(&timestamp, &message, nonce);
            if !is_taken(&candidate) {
                break candidate;
            }
            nonce += 1;
        };

        Self {
            id,
            message,
            timestamp,
        }
    }

    /// Get a short ID for display
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }

    /// One-line form used by `wit log --oneline`
    pub fn oneline(&self) -> String {
        format!("{} {}", self.short_id(), self.message)
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "commit {}\nDate:   {}\n\n    {}",
            self.id,
            self.timestamp.to_rfc3339(),
            self.message
        )
    }
}

fn derive_id(timestamp: &DateTime<Utc>, message: &str, nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(timestamp.to_rfc3339());
    hasher.update("_");
    hasher.update(message);
    if nonce > 0 {
        hasher.update(format!("_{}", nonce));
    }
    let digest = hex::encode(hasher.finalize());
    digest[..COMMIT_ID_LEN].to_string()
}
