//! Property-based testing for Wit
//!
//! Uses proptest to check the snapshot composition law and history
//! invariants across randomly generated trees and staging choices.

use ::wit::*;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Generate random relative file paths, some of them ignorable
fn path_strategy() -> impl Strategy<Value = PathBuf> {
    let dir_strategy = prop::collection::vec(
        prop_oneof!["[a-z]{1,6}".prop_map(|s| s), "dir[0-9]{1,2}".prop_map(|s| s),],
        0..=3,
    );

    let filename_strategy = prop_oneof![
        4 => "file[0-9]{1,3}\\.txt".prop_map(|s| s),
        4 => "[a-z]{1,8}\\.(rs|md)".prop_map(|s| s),
        1 => Just(".DS_Store".to_string()),
        1 => Just("Thumbs.db".to_string()),
        1 => "[a-z]{1,5}\\.tmp".prop_map(|s| s),
        1 => "~\\$[a-z]{1,5}\\.docx".prop_map(|s| s),
    ];

    (dir_strategy, filename_strategy).prop_map(|(dirs, filename)| {
        let mut path = PathBuf::new();
        for dir in dirs {
            path.push(dir);
        }
        path.join(filename)
    })
}

/// A tree of files plus the subset of them to stage
fn tree_strategy() -> impl Strategy<Value = Vec<(PathBuf, String, bool)>> {
    prop::collection::vec((path_strategy(), "[a-zA-Z0-9 ]{0,40}", any::<bool>()), 1..25)
}

/// Write files, skipping any whose path collides with an existing directory or file prefix
fn write_tree(root: &Path, files: &[(PathBuf, String, bool)]) -> BTreeMap<PathBuf, (String, bool)> {
    write_files(root, files, false)
}

/// Write files, replacing whatever file or directory stands in the way
fn overwrite_tree(root: &Path, files: &[(PathBuf, String, bool)]) -> BTreeMap<PathBuf, (String, bool)> {
    write_files(root, files, true)
}

fn write_files(
    root: &Path,
    files: &[(PathBuf, String, bool)],
    replace: bool,
) -> BTreeMap<PathBuf, (String, bool)> {
    let mut written: BTreeMap<PathBuf, (String, bool)> = BTreeMap::new();
    for (path, content, stage) in files {
        let full = root.join(path);
        let blocking_file = path
            .ancestors()
            .skip(1)
            .find(|a| !a.as_os_str().is_empty() && root.join(a).is_file())
            .map(Path::to_path_buf);

        if full.is_dir() || blocking_file.is_some() {
            if !replace {
                continue;
            }
            if full.is_dir() {
                fs::remove_dir_all(&full).unwrap();
                written.retain(|p, _| !p.starts_with(path));
            }
            if let Some(file) = blocking_file {
                fs::remove_file(root.join(&file)).unwrap();
                written.remove(&file);
            }
        }
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, content).unwrap();
        written.insert(path.clone(), (content.clone(), *stage));
    }
    written
}

/// Whether `a` lies strictly above or below `b`
fn nested(a: &Path, b: &Path) -> bool {
    a != b && (a.starts_with(b) || b.starts_with(a))
}

fn snapshot_map(wit: &Wit, id: &str) -> BTreeMap<PathBuf, String> {
    wit.snapshot_files(id)
        .unwrap()
        .into_iter()
        .map(|path| {
            let bytes = wit.read_snapshot_file(id, &path).unwrap();
            (path, String::from_utf8(bytes).unwrap())
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// snapshot = (parent files minus ignored, minus paths a staged path
    /// turned from file into directory or back) overlaid with staged files
    #[test]
    fn snapshot_composition_law(
        base in tree_strategy(),
        updates in tree_strategy(),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let (wit, _) = WitBuilder::new().init(root.to_path_buf()).unwrap();
        let policy = IgnorePolicy::default();

        let base = write_tree(root, &base);
        prop_assume!(base.keys().any(|p| !policy.should_ignore(p)));
        wit.add_all().unwrap();
        let first = wit.commit("base").unwrap();
        let parent = snapshot_map(&wit, &first.commit.id);

        // Parent never contains ignored paths
        prop_assert!(parent.keys().all(|p| !policy.should_ignore(p)));

        let updates = overwrite_tree(root, &updates);
        let mut staged = BTreeSet::new();
        for (path, (_, stage)) in &updates {
            if *stage {
                wit.add(path).unwrap();
                if !policy.should_ignore(path) {
                    staged.insert(path.clone());
                }
            }
        }
        prop_assume!(!staged.is_empty());

        let second = wit.commit("update").unwrap();
        let snapshot = snapshot_map(&wit, &second.commit.id);

        let mut expected = parent.clone();
        expected.retain(|path, _| !staged.iter().any(|s| nested(path, s)));
        for path in &staged {
            expected.insert(path.clone(), fs::read_to_string(root.join(path)).unwrap());
        }
        prop_assert_eq!(&snapshot, &expected);
        prop_assert_eq!(second.insertions, staged.iter().filter(|p| !parent.contains_key(*p)).count());

        // The parent snapshot is untouched by the second commit
        prop_assert_eq!(snapshot_map(&wit, &first.commit.id), parent);
    }

    /// Checking out any commit leaves nothing untracked when the tree was clean
    #[test]
    fn checkout_leaves_nothing_untracked(
        files in tree_strategy(),
        extra in tree_strategy(),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let (wit, _) = WitBuilder::new().init(root.to_path_buf()).unwrap();

        write_tree(root, &files);
        let report = wit.add_all().unwrap();
        prop_assume!(!report.staged.is_empty());
        let first = wit.commit("first").unwrap();

        write_tree(root, &extra);
        wit.add_all().unwrap();
        let _ = wit.commit("second");

        wit.checkout(&first.commit.id).unwrap();
        let status = wit.status().unwrap();

        prop_assert!(status.untracked.is_empty());
        let working: BTreeSet<_> = status.working.into_iter().collect();
        let expected: BTreeSet<_> = wit.snapshot_files(&first.commit.id).unwrap().into_iter().collect();
        prop_assert_eq!(working, expected);
    }

    /// Each commit adds exactly one ledger entry with a fresh identifier
    #[test]
    fn ledger_grows_by_one_per_commit(messages in prop::collection::vec("[a-z ]{0,12}", 1..8)) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let (wit, _) = WitBuilder::new().init(root.to_path_buf()).unwrap();

        let mut ids = BTreeSet::new();
        for (i, message) in messages.iter().enumerate() {
            fs::write(root.join("counter.txt"), i.to_string()).unwrap();
            wit.add("counter.txt").unwrap();
            let summary = wit.commit(message).unwrap();
            prop_assert!(ids.insert(summary.commit.id));
            prop_assert_eq!(wit.log().unwrap().len(), i + 1);
        }

        // Empty staging never adds an entry
        prop_assert!(matches!(wit.commit("empty"), Err(WitError::NothingToCommit)));
        prop_assert_eq!(wit.log().unwrap().len(), messages.len());
    }
}
