//! Per-file context handed to rules.

use crate::token::{Token, TokenStream};
use crate::types::Location;
use crate::utils::imports::{collect_imports, ImportAlias};

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Context provided to rules for the file being scanned.
///
/// Created when the engine starts a file and dropped when it finishes, so
/// the lazily populated caches it holds never outlive one file.
#[derive(Debug)]
pub struct FileContext<'a> {
    /// Path to the file as discovered.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    imports: OnceCell<Vec<ImportAlias>>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
            imports: OnceCell::new(),
        }
    }

    /// Import aliases declared at the top level of this file.
    ///
    /// Computed on first use and cached for the rest of the file's scan.
    pub fn imports(&self, tokens: &TokenStream) -> &[ImportAlias] {
        self.imports.get_or_init(|| collect_imports(tokens))
    }

    /// Returns true if `alias` is imported by this file.
    pub fn is_imported(&self, tokens: &TokenStream, alias: &str) -> bool {
        self.imports(tokens).iter().any(|i| i.alias == alias)
    }

    /// Directory containing the file.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// File name without its directory.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// File extension without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    /// Returns true if `<name>.<ext>` exists next to this file.
    #[must_use]
    pub fn has_sibling(&self, name: &str) -> bool {
        match (self.directory(), self.extension()) {
            (Some(dir), Some(ext)) => dir.join(format!("{name}.{ext}")).is_file(),
            _ => false,
        }
    }

    /// Location of `token` in this file.
    #[must_use]
    pub fn location(&self, token: &Token) -> Location {
        Location::new(self.relative_path.clone(), token.line, token.column)
            .with_span(token.offset, token.content.len())
    }

    /// Location at an explicit position, for findings inside a token.
    #[must_use]
    pub fn location_at(&self, line: usize, column: usize, offset: usize, length: usize) -> Location {
        Location::new(self.relative_path.clone(), line, column).with_span(offset, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{PhpTokenizer, Tokenizer};

    #[test]
    fn relative_path_strips_root() {
        let ctx = FileContext::new(
            Path::new("/project/src/Foo.php"),
            "",
            Path::new("/project"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("src/Foo.php"));
        assert_eq!(ctx.file_name(), Some("Foo.php"));
        assert_eq!(ctx.extension(), Some("php"));
    }

    #[test]
    fn path_outside_root_is_kept() {
        let ctx = FileContext::new(Path::new("/elsewhere/Foo.php"), "", Path::new("/project"));
        assert_eq!(ctx.relative_path, PathBuf::from("/elsewhere/Foo.php"));
    }

    #[test]
    fn imports_are_cached_per_context() {
        let source = "<?php\nuse App\\User;\n";
        let tokens = PhpTokenizer.tokenize(source).expect("tokenize");
        let ctx = FileContext::new(Path::new("Foo.php"), source, Path::new("."));

        assert!(ctx.is_imported(&tokens, "User"));

        // a different stream does not repopulate the cache
        let other = PhpTokenizer.tokenize("<?php\n").expect("tokenize");
        assert_eq!(ctx.imports(&other).len(), 1);
    }

    #[test]
    fn sibling_lookup_uses_same_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Bar.php"), "<?php\n").expect("write");
        let file = dir.path().join("Foo.php");
        let ctx = FileContext::new(&file, "", dir.path());

        assert!(ctx.has_sibling("Bar"));
        assert!(!ctx.has_sibling("Baz"));
    }
}
