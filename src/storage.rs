//! On-disk layout of a Wit repository
//!
//! Everything Wit persists lives under the metadata directory at the
//! repository root:
//!
//! ```text
//! .wit/
//! ├── config.json          # RepositoryMetadata (format version, settings)
//! ├── ledger.jsonl         # append-only commit ledger
//! ├── staging/             # files added but not yet committed
//! └── committed/
//!     ├── 3f2a9c01be/      # one full snapshot per commit identifier
//!     └── 8d41e7a6f0/
//! ```
//!
//! [`SnapshotStore`] owns this layout. It knows where things go and how to
//! create, enumerate and remove snapshot directories; it does not decide
//! what goes into a snapshot. Snapshot directories are written once at
//! commit time and never modified afterwards.

use crate::error::{Result, WitError};
use crate::ignore::METADATA_DIR;
use crate::ledger::Ledger;
use crate::types::{InitOutcome, RepositoryMetadata};
use crate::utils;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, trace};

const COMMITTED_DIR: &str = "committed";
const STAGING_DIR: &str = "staging";
const LEDGER_FILE: &str = "ledger.jsonl";
const CONFIG_FILE: &str = "config.json";

/// Directory-per-commit snapshot store plus the staging area and ledger paths
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    /// Repository metadata directory (`<root>/.wit`)
    metadata_dir: PathBuf,
}

impl SnapshotStore {
    /// Store for the repository rooted at `root`
    pub fn new(root: &Path) -> Self {
        Self {
            metadata_dir: root.join(METADATA_DIR),
        }
    }

    /// The metadata directory
    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    /// Directory holding one subdirectory per snapshot
    pub fn committed_dir(&self) -> PathBuf {
        self.metadata_dir.join(COMMITTED_DIR)
    }

    /// The staging area
    pub fn staging_dir(&self) -> PathBuf {
        self.metadata_dir.join(STAGING_DIR)
    }

    /// Location of the ledger file
    pub fn ledger_path(&self) -> PathBuf {
        self.metadata_dir.join(LEDGER_FILE)
    }

    /// Location of the repository config
    pub fn config_path(&self) -> PathBuf {
        self.metadata_dir.join(CONFIG_FILE)
    }

    /// Ledger handle for this repository
    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.ledger_path())
    }

    /// Whether the metadata directory exists
    pub fn is_initialized(&self) -> bool {
        self.metadata_dir.is_dir()
    }

    /// Create the layout, keeping anything that already exists
    ///
    /// The metadata directory is hidden on platforms that support it. On an
    /// existing repository this only fills in missing pieces, so history and
    /// settings survive a second `init`.
    pub fn create_layout(&self, metadata: &RepositoryMetadata) -> Result<InitOutcome> {
        let created = utils::create_directory(&self.metadata_dir, true)?;
        utils::create_directory(&self.committed_dir(), false)?;
        utils::create_directory(&self.staging_dir(), false)?;
        self.ledger().create()?;

        if !self.config_path().exists() {
            self.write_metadata(metadata)?;
        }

        if created {
            info!("Created repository layout at {:?}", self.metadata_dir);
            Ok(InitOutcome::Created)
        } else {
            debug!("Repository layout already present at {:?}", self.metadata_dir);
            Ok(InitOutcome::Reinitialized)
        }
    }

    /// Read `config.json`; `None` when the file is absent
    pub fn read_metadata(&self) -> Result<Option<RepositoryMetadata>> {
        let path = self.config_path();
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WitError::file_io(path, e)),
        }
    }

    /// Atomically replace `config.json`
    pub fn write_metadata(&self, metadata: &RepositoryMetadata) -> Result<()> {
        let json = serde_json::to_string_pretty(metadata)?;
        utils::atomic_write(&self.config_path(), json.as_bytes())
    }

    /// Directory of the snapshot for `id`
    ///
    /// Returns `None` when `id` is not a plain directory name, so a caller
    /// cannot address anything outside the store.
    pub fn snapshot_dir(&self, id: &str) -> Option<PathBuf> {
        let mut components = Path::new(id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.committed_dir().join(id)),
            _ => None,
        }
    }

    /// Whether a snapshot directory exists for `id`
    pub fn snapshot_exists(&self, id: &str) -> bool {
        self.snapshot_dir(id).is_some_and(|dir| dir.is_dir())
    }

    /// Create an empty snapshot directory for a freshly allocated identifier
    ///
    /// # Errors
    ///
    /// - [`WitError::Storage`] if the directory already exists or cannot be created
    pub fn create_snapshot(&self, id: &str) -> Result<PathBuf> {
        let dir = self
            .snapshot_dir(id)
            .ok_or_else(|| WitError::internal(format!("invalid snapshot identifier {:?}", id)))?;

        fs::create_dir_all(self.committed_dir())
            .map_err(|e| WitError::storage_with("failed to create snapshot store", WitError::file_io(self.committed_dir(), e)))?;
        fs::create_dir(&dir).map_err(|e| {
            WitError::storage_with(
                format!("failed to create snapshot {}", id),
                WitError::file_io(&dir, e),
            )
        })?;

        trace!("Created snapshot directory {:?}", dir);
        Ok(dir)
    }

    /// Identifiers of every snapshot directory, sorted
    pub fn list_snapshots(&self) -> Result<Vec<String>> {
        let committed = self.committed_dir();
        let mut ids = Vec::new();

        if committed.is_dir() {
            for entry in fs::read_dir(&committed).map_err(|e| WitError::file_io(&committed, e))? {
                let entry = entry.map_err(|e| WitError::file_io(&committed, e))?;
                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    ids.push(entry.file_name().to_string_lossy().to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Total size in bytes of the files in a snapshot
    pub fn snapshot_size(&self, id: &str) -> Result<u64> {
        let Some(dir) = self.snapshot_dir(id) else {
            return Ok(0);
        };
        let mut total = 0;
        for entry in walkdir::WalkDir::new(dir).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() {
                total += entry.metadata()?.len();
            }
        }
        Ok(total)
    }

    /// Remove a snapshot directory and everything in it
    ///
    /// Only used for snapshots no ledger entry references.
    pub fn remove_snapshot(&self, id: &str) -> Result<()> {
        if let Some(dir) = self.snapshot_dir(id) {
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(|e| WitError::file_io(&dir, e))?;
                debug!("Removed snapshot directory {}", id);
            }
        }
        Ok(())
    }
}
