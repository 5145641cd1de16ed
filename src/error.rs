//! Error types for the Wit library
//!
//! This module defines all error types that can occur during repository
//! operations. Every failure path surfaces one of these variants; none are
//! swallowed. Errors are designed to be informative and actionable, and
//! [`WitError::user_message`] adds a hint suitable for the command line.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the Wit library
pub type Result<T> = std::result::Result<T, WitError>;

/// Main error type for all Wit operations
#[derive(Debug, Error)]
pub enum WitError {
    /// The operation requires an initialized repository
    #[error("not a wit repository (or any of the parent directories): {0:?}")]
    NotARepository(PathBuf),

    /// An `add` target does not exist under the repository root
    #[error("pathspec {0:?} did not match any files")]
    PathNotFound(PathBuf),

    /// An `add` target resolves outside the repository root
    #[error("path {0:?} is outside the repository")]
    PathOutsideRepository(PathBuf),

    /// Commit requested with an empty staging area
    #[error("nothing to commit: the staging area is empty")]
    NothingToCommit,

    /// Commit message already present in history while duplicates are rejected
    #[error("a commit with message {0:?} already exists")]
    DuplicateMessage(String),

    /// No snapshot (or ledger entry) exists for the requested commit
    #[error("pathspec '{0}' did not match any commit known to wit")]
    UnknownCommit(String),

    /// A commit id prefix matched more than one commit
    #[error("commit prefix '{prefix}' is ambiguous ({matches} matches)")]
    AmbiguousCommit {
        /// Prefix given by the caller
        prefix: String,
        /// Number of ledger entries sharing the prefix
        matches: usize,
    },

    /// Failure writing the ledger or a snapshot, or a concurrent-writer conflict
    #[error("Storage error: {message}")]
    Storage {
        /// What the storage layer was doing
        message: String,
        /// Underlying cause, usually a [`WitError::FileIo`]
        #[source]
        cause: Option<Box<WitError>>,
    },

    /// Primitive copy/delete/create failure on a specific path
    #[error("IO error at {path:?}: {source}")]
    FileIo {
        /// Path the primitive was operating on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O errors without path context
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A ledger line could not be decoded
    #[error("Corrupt ledger entry at line {line}: {reason}")]
    CorruptLedger {
        /// 1-based line number in the ledger file
        line: usize,
        /// Decoder message
        reason: String,
    },

    /// Pattern parsing error
    #[error("Invalid ignore pattern: {0}")]
    InvalidPattern(String),

    /// Walk directory error from walkdir crate
    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WitError {
    /// Create a storage error wrapping the failure that caused it
    pub fn storage_with(msg: impl Into<String>, cause: WitError) -> Self {
        WitError::Storage {
            message: msg.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Attach a path to a bare I/O error
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WitError::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        WitError::Internal(msg.into())
    }

    /// Check if this error belongs to the storage class (ledger or snapshot writes)
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            WitError::Storage { .. } | WitError::CorruptLedger { .. }
        )
    }

    /// Check if retrying the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            WitError::Storage { cause: Some(cause), .. } => cause.is_recoverable(),
            WitError::Storage { cause: None, .. } => true,
            WitError::FileIo { source, .. } | WitError::Io(source) => matches!(
                source.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            WitError::NotARepository(path) => {
                format!(
                    "not a wit repository: {:?}. Run 'wit init' in the project root first.",
                    path
                )
            }
            WitError::PathNotFound(path) => {
                format!("pathspec {:?} did not match any files", path)
            }
            WitError::NothingToCommit => {
                "There is no need to commit until you have made an addition. Use 'wit add <path>' first."
                    .to_string()
            }
            WitError::UnknownCommit(id) => {
                format!("Commit '{}' not found. Use 'wit log' to see available commits.", id)
            }
            WitError::AmbiguousCommit { prefix, .. } => {
                format!("Commit prefix '{}' is ambiguous. Type more characters of the id.", prefix)
            }
            WitError::DuplicateMessage(message) => {
                format!(
                    "A commit with message {:?} already exists and this repository rejects duplicates.",
                    message
                )
            }
            WitError::Storage { message, cause } => match cause {
                Some(cause) => format!("{} (caused by: {})", message, cause),
                None => message.clone(),
            },
            _ => self.to_string(),
        }
    }
}
