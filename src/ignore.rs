//! Path selection policy
//!
//! Decides whether a root-relative path is eligible for tracking. The policy
//! is a pure value with no I/O: it is built once per repository from
//! [`IgnoreRules`], the configured results directory and any extra glob
//! patterns, and then consulted by staging, snapshot construction and
//! checkout.
//!
//! A path is ignored when:
//!
//! - any segment equals a reserved directory name (`.git`, `.wit`) or the
//!   results directory
//! - its leaf name matches an OS/editor artifact (case-insensitive)
//! - its leaf name starts with a lock-file prefix (`~$`)
//! - its leaf name ends with a temp/shortcut suffix (`.tmp`, `.lnk`)
//! - it matches one of the extra glob patterns
//!
//! ```rust
//! use wit::ignore::IgnorePolicy;
//! use std::path::Path;
//!
//! let policy = IgnorePolicy::default();
//! assert!(policy.should_ignore(Path::new("photos/Thumbs.db")));
//! assert!(policy.should_ignore(Path::new(".wit/staging/a.txt")));
//! assert!(!policy.should_ignore(Path::new("src/main.rs")));
//! ```

use crate::error::{Result, WitError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Name of the repository metadata directory
pub const METADATA_DIR: &str = ".wit";

/// Default name of the designated results directory
pub const DEFAULT_RESULTS_DIR: &str = ".wit_results";

/// The four name sets the policy matches against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRules {
    /// OS/editor artifact file names, matched case-insensitively
    pub files: BTreeSet<String>,
    /// Reserved directory names, matched against every path segment
    pub folders: BTreeSet<String>,
    /// Leaf-name prefixes
    pub prefixes: BTreeSet<String>,
    /// Leaf-name suffixes
    pub extensions: BTreeSet<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        fn set(items: &[&str]) -> BTreeSet<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            files: set(&["desktop.ini", "Thumbs.db", "ehthumbs.db", ".DS_Store"]),
            folders: set(&[".git", METADATA_DIR]),
            prefixes: set(&["~$"]),
            extensions: set(&[".tmp", ".lnk"]),
        }
    }
}

/// Immutable ignore policy shared by every repository operation
#[derive(Debug, Clone)]
pub struct IgnorePolicy {
    rules: IgnoreRules,
    results_dir: Option<String>,
    patterns: Vec<String>,
    globs: Option<GlobSet>,
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        Self::new(IgnoreRules::default())
    }
}

impl IgnorePolicy {
    /// Create a policy from explicit rules, with the default results directory
    pub fn new(rules: IgnoreRules) -> Self {
        Self {
            rules,
            results_dir: Some(DEFAULT_RESULTS_DIR.to_string()),
            patterns: Vec::new(),
            globs: None,
        }
    }

    /// Replace the designated results directory (`None` disables it)
    pub fn with_results_dir(mut self, results_dir: Option<String>) -> Self {
        self.results_dir = results_dir.filter(|dir| !dir.is_empty());
        self
    }

    /// Add glob patterns matched against the root-relative path
    ///
    /// # Errors
    ///
    /// - [`WitError::InvalidPattern`] if a pattern does not compile
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        if patterns.is_empty() {
            self.patterns.clear();
            self.globs = None;
            return Ok(self);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| WitError::InvalidPattern(format!("{}: {}", pattern, e)))?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .map_err(|e| WitError::InvalidPattern(e.to_string()))?;

        self.patterns = patterns;
        self.globs = Some(globs);
        Ok(self)
    }

    /// Rules this policy was built from
    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    /// Designated results directory, if any
    pub fn results_dir(&self) -> Option<&str> {
        self.results_dir.as_deref()
    }

    /// Extra glob patterns in the order they were given
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `name` is a reserved directory name (metadata or results)
    pub fn is_reserved_dir(&self, name: &str) -> bool {
        self.rules.folders.contains(name) || self.results_dir.as_deref() == Some(name)
    }

    /// Decide whether a path or bare name is excluded from tracking
    pub fn should_ignore(&self, path: &Path) -> bool {
        let mut leaf = None;
        for component in path.components() {
            if let Component::Normal(segment) = component {
                let segment = segment.to_string_lossy();
                if self.is_reserved_dir(&segment) {
                    return true;
                }
                leaf = Some(segment.into_owned());
            }
        }

        if let Some(name) = leaf {
            if self.ignores_name(&name) {
                return true;
            }
        }

        match &self.globs {
            Some(globs) => globs.is_match(path),
            None => false,
        }
    }

    fn ignores_name(&self, name: &str) -> bool {
        if self.rules.files.iter().any(|file| file.eq_ignore_ascii_case(name)) {
            return true;
        }
        if self.rules.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())) {
            return true;
        }
        self.rules.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}
