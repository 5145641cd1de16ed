//! Integration tests for Wit
//!
//! End-to-end scenarios: stage/commit/checkout cycles over generated
//! projects, history integrity and ignore rules across every operation.

use ::wit::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::info;

/// Test harness for multi-commit scenarios
pub struct WitTestHarness {
    pub temp_dir: TempDir,
    pub wit: Wit,
    pub rng: StdRng,
}

impl WitTestHarness {
    /// Create a new harness over an empty, initialized repository
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let (wit, _) = WitBuilder::new().init(temp_dir.path().to_path_buf()).unwrap();

        Self {
            temp_dir,
            wit,
            rng: StdRng::seed_from_u64(42),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file relative to the root, creating parents
    pub fn write(&self, path: &str, content: &str) {
        let full = self.root().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    /// Generate a nested project of random text files
    pub fn generate_project(&mut self, dirs: usize, files_per_dir: usize) -> anyhow::Result<()> {
        for d in 0..dirs {
            let dir = self.root().join(format!("dir_{}", d)).join(format!("sub_{}", d % 2));
            fs::create_dir_all(&dir)?;
            for f in 0..files_per_dir {
                let content = self.random_text(20..200);
                fs::write(dir.join(format!("file_{}.txt", f)), content)?;
            }
        }
        Ok(())
    }

    /// Rewrite, create or delete a few random working files
    pub fn mutate(&mut self, count: usize) -> anyhow::Result<()> {
        for i in 0..count {
            let files = self.working_files()?;
            match self.rng.random_range(0..3) {
                0 if !files.is_empty() => {
                    let idx = self.rng.random_range(0..files.len());
                    let content = self.random_text(10..100);
                    fs::write(self.root().join(&files[idx]), content)?;
                }
                1 if !files.is_empty() => {
                    let idx = self.rng.random_range(0..files.len());
                    fs::remove_file(self.root().join(&files[idx]))?;
                }
                _ => {
                    let content = self.random_text(10..100);
                    let n = self.rng.random_range(0..1000);
                    fs::write(self.root().join(format!("new_{}_{}.txt", i, n)), content)?;
                }
            }
        }
        Ok(())
    }

    /// Eligible working files, sorted
    pub fn working_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(self.wit.status()?.working.into_iter().collect())
    }

    /// Contents of every eligible working file
    pub fn working_state(&self) -> anyhow::Result<BTreeMap<PathBuf, Vec<u8>>> {
        let mut state = BTreeMap::new();
        for path in self.working_files()? {
            state.insert(path.clone(), fs::read(self.root().join(&path))?);
        }
        Ok(state)
    }

    /// Contents of every file in a snapshot
    pub fn snapshot_state(&self, id: &str) -> anyhow::Result<BTreeMap<PathBuf, Vec<u8>>> {
        let mut state = BTreeMap::new();
        for path in self.wit.snapshot_files(id)? {
            let bytes = self.wit.read_snapshot_file(id, &path)?;
            state.insert(path, bytes);
        }
        Ok(state)
    }

    fn random_text(&mut self, size_range: std::ops::Range<usize>) -> String {
        let words = ["alpha", "beta", "gamma", "delta", "snapshot", "ledger", "\n"];
        let size = self.rng.random_range(size_range);
        let mut text = String::with_capacity(size);
        while text.len() < size {
            text.push_str(words[self.rng.random_range(0..words.len())]);
            text.push(' ');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_first_and_second_commit_scenario() {
        let harness = WitTestHarness::new();

        harness.write("a.txt", "hello");
        harness.wit.add("a.txt").unwrap();
        let first = harness.wit.commit("first").unwrap();
        assert_eq!(harness.wit.log().unwrap().len(), 1);
        assert_eq!(
            harness.wit.read_snapshot_file(&first.commit.id, Path::new("a.txt")).unwrap(),
            b"hello"
        );

        harness.write("a.txt", "world");
        harness.wit.add("a.txt").unwrap();
        let second = harness.wit.commit("second").unwrap();
        assert_eq!(harness.wit.log().unwrap().len(), 2);
        assert_eq!(
            harness.wit.read_snapshot_file(&second.commit.id, Path::new("a.txt")).unwrap(),
            b"world"
        );
        assert_eq!(
            harness.wit.read_snapshot_file(&first.commit.id, Path::new("a.txt")).unwrap(),
            b"hello"
        );

        harness.wit.checkout(&first.commit.id).unwrap();
        assert_eq!(fs::read_to_string(harness.root().join("a.txt")).unwrap(), "hello");
    }

    #[test]
    #[traced_test]
    fn test_commit_checkout_cycles_restore_exact_state() {
        let mut harness = WitTestHarness::new();
        harness.generate_project(3, 4).unwrap();

        let mut history = Vec::new();
        for round in 0..6 {
            harness.wit.add_all().unwrap();
            let summary = harness.wit.commit(&format!("round {}", round)).unwrap();
            // Deleted working files are carried forward, so compare against the snapshot
            let state = harness.snapshot_state(&summary.commit.id).unwrap();
            info!("Round {}: {} files", round, state.len());
            history.push((summary.commit.id, state));
            harness.mutate(5).unwrap();
        }

        for (id, expected) in history.iter().rev() {
            harness.wit.checkout(id).unwrap();
            let restored = harness.working_state().unwrap();
            assert_eq!(&restored, expected, "checkout of {} differs", id);
        }
    }

    #[test]
    fn test_add_all_commit_matches_snapshot_of_working_tree() {
        let mut harness = WitTestHarness::new();
        harness.generate_project(2, 3).unwrap();

        harness.wit.add_all().unwrap();
        let summary = harness.wit.commit("everything").unwrap();

        let working = harness.working_state().unwrap();
        let snapshot = harness.snapshot_state(&summary.commit.id).unwrap();
        assert_eq!(working, snapshot);
        assert_eq!(summary.snapshot_files, working.len());
    }

    #[test]
    fn test_deleted_files_are_carried_forward_until_restored() {
        let harness = WitTestHarness::new();
        harness.write("a.txt", "a");
        harness.write("b.txt", "b");
        harness.wit.add_all().unwrap();
        harness.wit.commit("both").unwrap();

        // Removing a working file does not remove it from later snapshots
        fs::remove_file(harness.root().join("b.txt")).unwrap();
        harness.write("c.txt", "c");
        harness.wit.add("c.txt").unwrap();
        let second = harness.wit.commit("add c").unwrap();

        let files = harness.wit.snapshot_files(&second.commit.id).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt"), PathBuf::from("c.txt")]
        );

        harness.wit.checkout(&second.commit.id).unwrap();
        assert_eq!(fs::read_to_string(harness.root().join("b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_ledger_is_append_only() {
        let harness = WitTestHarness::new();

        let mut seen = Vec::new();
        for i in 0..5 {
            harness.write("counter.txt", &i.to_string());
            harness.wit.add("counter.txt").unwrap();
            harness.wit.commit(&format!("commit {}", i)).unwrap();

            let log = harness.wit.log().unwrap();
            assert_eq!(log.len(), i + 1);
            assert_eq!(&log[..i], &seen[..]);
            seen = log;
        }

        // Timestamps never go backwards
        assert!(seen.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_artifacts_never_reach_staging_or_snapshots() {
        let harness = WitTestHarness::new();
        harness.write("src/main.rs", "fn main() {}");
        harness.write(".DS_Store", "junk");
        harness.write("src/Thumbs.db", "junk");
        harness.write("build/output.tmp", "junk");
        harness.write("~$report.docx", "lock");
        harness.write(".git/HEAD", "ref: refs/heads/main");

        harness.wit.add_all().unwrap();
        harness.wit.add(".DS_Store").unwrap();
        harness.wit.add("build").unwrap();

        let status = harness.wit.status().unwrap();
        assert_eq!(status.staged.iter().collect::<Vec<_>>(), vec![&PathBuf::from("src/main.rs")]);

        let summary = harness.wit.commit("source only").unwrap();
        assert_eq!(
            harness.wit.snapshot_files(&summary.commit.id).unwrap(),
            vec![PathBuf::from("src/main.rs")]
        );
    }

    #[test]
    fn test_checkout_then_status_has_no_untracked() {
        let harness = WitTestHarness::new();
        harness.write("a.txt", "a");
        harness.write("nested/b.txt", "b");
        harness.wit.add_all().unwrap();
        let first = harness.wit.commit("first").unwrap();

        harness.write("a.txt", "changed");
        harness.wit.add("a.txt").unwrap();
        harness.wit.commit("second").unwrap();

        harness.wit.checkout(&first.commit.id).unwrap();
        let status = harness.wit.status().unwrap();
        assert!(status.untracked.is_empty());
        assert!(status.staged.is_empty());
    }

    #[test]
    fn test_custom_results_dir_and_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let (wit, _) = WitBuilder::new()
            .results_dir("reports")
            .ignore_patterns(vec!["*.log".to_string()])
            .init(temp_dir.path().to_path_buf())
            .unwrap();

        fs::create_dir_all(temp_dir.path().join("reports")).unwrap();
        fs::write(temp_dir.path().join("reports/summary.txt"), "results").unwrap();
        fs::write(temp_dir.path().join("server.log"), "log").unwrap();
        fs::write(temp_dir.path().join("kept.txt"), "kept").unwrap();

        let report = wit.add_all().unwrap();
        assert_eq!(report.staged, vec![PathBuf::from("kept.txt")]);

        // Settings survive reopening
        let reopened = Wit::open(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.config().results_dir, "reports");
        assert!(reopened.policy().should_ignore(Path::new("debug.log")));
    }
}
