//! Candidate file discovery.

use crate::config::{ConfigError, ScanConfig};

use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Version-control metadata directories never descended into.
const VCS_DIRECTORIES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".bzr",
    "CVS",
    "_darcs",
    "_svn",
    ".arch-params",
    ".monotone",
];

/// Walks root directories and yields the files to lint.
///
/// Traversal is depth-first with entries sorted by file name, so the output
/// is stable across runs on an unchanged tree.
#[derive(Debug, Clone)]
pub struct FileScanner {
    include: Pattern,
    exclude: Vec<Pattern>,
}

impl FileScanner {
    /// Creates a scanner from an include glob and exclude globs.
    ///
    /// Patterns match against the file name; excludes also match against
    /// the path relative to the scanned root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if a glob does not compile.
    pub fn new<S: AsRef<str>>(include: &str, exclude: &[S]) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile(include)?,
            exclude: exclude
                .iter()
                .map(|p| compile(p.as_ref()))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Creates a scanner from the `[scan]` section of a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if a glob does not compile.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ConfigError> {
        Self::new(&config.include, &config.exclude)
    }

    /// Lazily yields matching files under each root, roots in the given order.
    ///
    /// Unreadable roots and subdirectories are skipped.
    pub fn scan<'a>(&'a self, roots: &'a [PathBuf]) -> impl Iterator<Item = PathBuf> + 'a {
        roots.iter().flat_map(move |root| {
            WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| !is_ignored(entry))
                .filter_map(move |entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        if err.depth() == 0 {
                            warn!("Skipping unreadable root {}: {}", root.display(), err);
                        } else {
                            debug!("Skipping unreadable entry under {}: {}", root.display(), err);
                        }
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .filter(move |entry| self.accepts(entry.path(), root))
                .map(DirEntry::into_path)
        })
    }

    /// Checks a file against the include and exclude patterns.
    #[must_use]
    pub fn accepts(&self, path: &Path, root: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if !self.include.matches(name) {
            return false;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let excluded = self
            .exclude
            .iter()
            .any(|p| p.matches(name) || p.matches_path(relative));
        if excluded {
            debug!("Excluding: {}", path.display());
        }
        !excluded
    }
}

fn compile(pattern: &str) -> Result<Pattern, ConfigError> {
    Pattern::new(pattern).map_err(|source| ConfigError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Dotfiles and VCS metadata below a root are never visited.
fn is_ignored(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || VCS_DIRECTORIES.contains(&name.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "<?php\n").expect("write");
    }

    fn scanner() -> FileScanner {
        FileScanner::new("*.php", &["*Sniff.php"]).expect("scanner")
    }

    fn relative(files: &[PathBuf], base: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(base)
                    .unwrap_or(f)
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn finds_php_files_in_stable_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "src/b.php");
        touch(dir.path(), "src/a.php");
        touch(dir.path(), "src/Nested/c.php");
        touch(dir.path(), "src/readme.md");
        touch(dir.path(), "tests/t.php");

        let roots = vec![dir.path().join("src"), dir.path().join("tests")];
        let files: Vec<_> = scanner().scan(&roots).collect();

        assert_eq!(
            relative(&files, dir.path()),
            vec!["src/Nested/c.php", "src/a.php", "src/b.php", "tests/t.php"]
        );

        let again: Vec<_> = scanner().scan(&roots).collect();
        assert_eq!(files, again);
    }

    #[test]
    fn skips_excluded_dotfiles_and_vcs() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "src/FooSniff.php");
        touch(dir.path(), "src/.hidden.php");
        touch(dir.path(), "src/.git/hook.php");
        touch(dir.path(), "src/CVS/old.php");
        touch(dir.path(), "src/Keep.php");

        let roots = vec![dir.path().join("src")];
        let files: Vec<_> = scanner().scan(&roots).collect();
        assert_eq!(relative(&files, dir.path()), vec!["src/Keep.php"]);
    }

    #[test]
    fn excludes_match_relative_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "src/legacy/Old.php");
        touch(dir.path(), "src/New.php");

        let scanner = FileScanner::new("*.php", &["legacy/*"]).expect("scanner");
        let roots = vec![dir.path().join("src")];
        let files: Vec<_> = scanner.scan(&roots).collect();
        assert_eq!(relative(&files, dir.path()), vec!["src/New.php"]);
    }

    #[test]
    fn missing_root_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "src/a.php");

        let roots = vec![dir.path().join("missing"), dir.path().join("src")];
        let files: Vec<_> = scanner().scan(&roots).collect();
        assert_eq!(relative(&files, dir.path()), vec!["src/a.php"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "src/a.php");
        touch(dir.path(), "src/locked/hidden.php");
        touch(dir.path(), "src/z.php");
        let locked = dir.path().join("src/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        let roots = vec![dir.path().join("src")];
        let files: Vec<_> = scanner().scan(&roots).collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

        // a privileged user can still read the locked directory
        let outside: Vec<_> = relative(&files, dir.path())
            .into_iter()
            .filter(|f| !f.starts_with("src/locked/"))
            .collect();
        assert_eq!(outside, vec!["src/a.php", "src/z.php"]);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = FileScanner::new("[", &[] as &[&str]).expect_err("invalid");
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }
}
