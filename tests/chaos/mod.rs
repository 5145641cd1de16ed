//! Chaos testing for Wit
//!
//! Injects failures into the commit and checkout paths and damages the
//! repository on disk, then checks that durable state (ledger and
//! snapshots) is never left inconsistent and that every failure surfaces
//! as an error.

use ::wit::*;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::info;

/// Repository with one commit, used as the starting point for each fault
pub struct WitChaosTest {
    pub temp_dir: TempDir,
    pub wit: Wit,
    pub first_id: String,
}

impl WitChaosTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let (wit, _) = WitBuilder::new().init(temp_dir.path().to_path_buf()).unwrap();

        fs::write(temp_dir.path().join("base.txt"), "base").unwrap();
        wit.add("base.txt").unwrap();
        let first_id = wit.commit("base").unwrap().commit.id;

        Self {
            temp_dir,
            wit,
            first_id,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn stage(&self, path: &str, content: &str) {
        let full = self.root().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
        self.wit.add(path).unwrap();
    }

    /// Snapshot ids, ledger length and staged paths
    pub fn durable_state(&self) -> (Vec<String>, usize, Vec<PathBuf>) {
        let snapshots = self.wit.store().list_snapshots().unwrap();
        let ledger_len = self.wit.store().ledger().len().unwrap();
        let staged = self.wit.status().unwrap().staged.into_iter().collect();
        (snapshots, ledger_len, staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_commit_fails_while_ledger_locked() {
        let chaos = WitChaosTest::new();
        chaos.stage("second.txt", "second");
        let before = chaos.durable_state();

        let holder = File::open(chaos.wit.store().ledger_path()).unwrap();
        holder.lock_exclusive().unwrap();

        let err = chaos.wit.commit("blocked").unwrap_err();
        info!("Commit under lock failed with: {}", err);
        assert!(err.is_storage());

        // Nothing durable changed and the orphaned snapshot was discarded
        assert_eq!(chaos.durable_state(), before);

        FileExt::unlock(&holder).unwrap();
        drop(holder);

        // Staging was kept, so the retry succeeds
        let summary = chaos.wit.commit("retried").unwrap();
        assert_eq!(summary.files_staged, 1);
        assert_eq!(chaos.wit.log().unwrap().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    #[traced_test]
    fn test_snapshot_write_failure_leaves_no_trace() {
        use std::os::unix::fs::PermissionsExt;

        let chaos = WitChaosTest::new();
        chaos.stage("secret.txt", "unreadable once staged");
        let staged = chaos.wit.store().staging_dir().join("secret.txt");
        fs::set_permissions(&staged, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through mode bits; no failure to inject
        if fs::read(&staged).is_ok() {
            fs::set_permissions(&staged, fs::Permissions::from_mode(0o644)).unwrap();
            return;
        }

        let before = chaos.durable_state();
        let err = chaos.wit.commit("unreadable").unwrap_err();
        info!("Commit with unreadable staged file failed with: {}", err);
        assert!(err.is_storage());
        assert_eq!(chaos.durable_state(), before);
        assert!(chaos.wit.gc(true).unwrap().orphaned.is_empty());

        fs::set_permissions(&staged, fs::Permissions::from_mode(0o644)).unwrap();
        chaos.wit.commit("readable again").unwrap();
        assert_eq!(chaos.wit.log().unwrap().len(), 2);
    }

    #[test]
    fn test_kind_change_does_not_block_commits() {
        let chaos = WitChaosTest::new();
        chaos.stage("x/y.txt", "nested");
        chaos.wit.commit("nested").unwrap();

        fs::remove_dir_all(chaos.root().join("x")).unwrap();
        chaos.stage("x", "now a file");
        let summary = chaos.wit.commit("x as file").unwrap();
        assert_eq!(
            chaos.wit.snapshot_files(&summary.commit.id).unwrap(),
            vec![PathBuf::from("base.txt"), PathBuf::from("x")]
        );

        chaos.stage("after.txt", "after");
        chaos.wit.commit("after").unwrap();
        assert_eq!(chaos.wit.log().unwrap().len(), 4);
        assert!(chaos.wit.gc(true).unwrap().orphaned.is_empty());
    }

    #[test]
    fn test_corrupt_ledger_line_is_reported() {
        let chaos = WitChaosTest::new();
        OpenOptions::new()
            .append(true)
            .open(chaos.wit.store().ledger_path())
            .unwrap()
            .write_all(b"{\"id\": \"truncated\n")
            .unwrap();

        match chaos.wit.log() {
            Err(WitError::CorruptLedger { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected corrupt ledger, got {:?}", other),
        }

        chaos.stage("more.txt", "more");
        assert!(chaos.wit.commit("after corruption").unwrap_err().is_storage());
        assert_eq!(chaos.wit.store().list_snapshots().unwrap(), vec![chaos.first_id.clone()]);
    }

    #[test]
    fn test_metadata_removed_after_open() {
        let chaos = WitChaosTest::new();
        fs::remove_dir_all(chaos.root().join(".wit")).unwrap();

        assert!(matches!(chaos.wit.add_all(), Err(WitError::NotARepository(_))));
        assert!(matches!(chaos.wit.commit("x"), Err(WitError::NotARepository(_))));
        assert!(matches!(chaos.wit.checkout(&chaos.first_id), Err(WitError::NotARepository(_))));
        assert!(matches!(chaos.wit.gc(false), Err(WitError::NotARepository(_))));
        assert!(!chaos.root().join(".wit").exists());
        assert!(chaos.root().join("base.txt").exists());
    }

    #[test]
    #[traced_test]
    fn test_missing_snapshot_for_last_commit() {
        let chaos = WitChaosTest::new();
        fs::remove_dir_all(chaos.wit.store().committed_dir().join(&chaos.first_id)).unwrap();

        assert!(matches!(
            chaos.wit.checkout(&chaos.first_id),
            Err(WitError::UnknownCommit(_))
        ));
        assert!(chaos.root().join("base.txt").exists());

        // Committing still works; only staged files reach the new snapshot
        chaos.stage("fresh.txt", "fresh");
        let summary = chaos.wit.commit("after loss").unwrap();
        assert_eq!(
            chaos.wit.snapshot_files(&summary.commit.id).unwrap(),
            vec![PathBuf::from("fresh.txt")]
        );
    }

    #[test]
    fn test_checkout_halts_on_first_failure() {
        let chaos = WitChaosTest::new();
        chaos.stage("x", "file in snapshot");
        let target = chaos.wit.commit("x as file").unwrap().commit.id;

        // Block the restore with a directory holding only an ignored file
        fs::remove_file(chaos.root().join("x")).unwrap();
        fs::create_dir_all(chaos.root().join("x")).unwrap();
        fs::write(chaos.root().join("x/Thumbs.db"), "junk").unwrap();

        let err = chaos.wit.checkout(&target).unwrap_err();
        assert!(matches!(err, WitError::FileIo { .. }));
        assert!(chaos.root().join("x").is_dir());
    }

    #[test]
    fn test_gc_collects_leftover_snapshots() {
        let chaos = WitChaosTest::new();
        let orphan = chaos.wit.store().committed_dir().join("0123456789");
        fs::create_dir_all(orphan.join("deep")).unwrap();
        fs::write(orphan.join("deep/file.txt"), "abandoned").unwrap();

        let stats = chaos.wit.gc(false).unwrap();

        assert_eq!(stats.orphaned, vec!["0123456789".to_string()]);
        assert_eq!(stats.snapshots_deleted, 1);
        assert!(!orphan.exists());
        assert!(chaos.wit.store().snapshot_exists(&chaos.first_id));
        assert_eq!(chaos.wit.log().unwrap().len(), 1);
    }
}
