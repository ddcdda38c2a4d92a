//! Conventional project directories.

use std::path::{Path, PathBuf};

/// Catalogue of the top-level directories of a PHP project.
///
/// Enforceable roots hold source code that should follow the coding
/// standard. Discouraged directories indicate a layout that should be
/// migrated, each paired with advice on how.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootDirectories;

const ENFORCEABLE: &[&str] = &["src", "tests", "app", "bootstrap", "config", "database"];

const DISCOURAGED: &[(&str, &str)] = &[
    ("public_html", "This is very old-school. Use `public` instead."),
    (
        "app",
        "Develop your application as a library and use the `src` directory instead.",
    ),
    (
        "database",
        "If you have raw SQL migrations, move them to the `resources` directory. \
         If you have code migrations, move them to the `src` directory",
    ),
    (
        "app/commands",
        "Eww, Laravel 4. Port to Console or Commands namespaces.",
    ),
    ("app/config", "Eww, Laravel 4. Move to `config`."),
    ("app/controllers", "Eww, Laravel 4. Port to namespaces."),
    ("app/database", "Eww, Laravel 4. Port to namespaces."),
    ("app/lang", "Eww, Laravel 4. Move to `resources/lang`."),
    ("app/models", "Eww, Laravel 4. Port to a models namespace."),
    ("app/start", "Eww, Laravel 4. Port to service providers"),
    ("app/storage", "Eww, Laravel 4. Move to `storage`."),
    ("app/tests", "Eww, Laravel 4. Move to `tests`."),
    ("app/views", "Eww, Laravel 4. Move to `resources/views`."),
];

impl RootDirectories {
    /// Directories eligible for scanning, in scan order.
    #[must_use]
    pub fn enforceable() -> &'static [&'static str] {
        ENFORCEABLE
    }

    /// Discouraged directories and the advice for each.
    #[must_use]
    pub fn discouraged() -> &'static [(&'static str, &'static str)] {
        DISCOURAGED
    }

    /// Enforceable directories that exist under `base`.
    #[must_use]
    pub fn existing_enforceable(base: &Path) -> Vec<PathBuf> {
        ENFORCEABLE
            .iter()
            .map(|dir| base.join(dir))
            .filter(|path| path.is_dir())
            .collect()
    }

    /// Discouraged directories that exist under `base`, with their advice.
    #[must_use]
    pub fn existing_discouraged(base: &Path) -> Vec<(&'static str, &'static str)> {
        DISCOURAGED
            .iter()
            .filter(|(dir, _)| base.join(dir).is_dir())
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn only_existing_enforceable_roots() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("tests")).expect("mkdir");
        fs::create_dir(dir.path().join("src")).expect("mkdir");
        fs::create_dir(dir.path().join("vendor")).expect("mkdir");
        fs::write(dir.path().join("config"), "not a directory").expect("write");

        assert_eq!(
            RootDirectories::existing_enforceable(dir.path()),
            vec![dir.path().join("src"), dir.path().join("tests")]
        );
    }

    #[test]
    fn discouraged_laravel4_layout() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("app/views")).expect("mkdir");

        let found: Vec<_> = RootDirectories::existing_discouraged(dir.path())
            .into_iter()
            .map(|(dir, _)| dir)
            .collect();
        assert_eq!(found, vec!["app", "app/views"]);
    }

    #[test]
    fn catalogue_order() {
        assert_eq!(RootDirectories::enforceable()[..2], ["src", "tests"]);
        assert!(RootDirectories::discouraged()
            .iter()
            .all(|(dir, advice)| !dir.is_empty() && !advice.is_empty()));
    }

    #[test]
    fn empty_project_has_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(RootDirectories::existing_enforceable(dir.path()).is_empty());
        assert!(RootDirectories::existing_discouraged(dir.path()).is_empty());
    }
}
