//! Lint engine: tokenizes files and dispatches tokens to rules.

use crate::config::Config;
use crate::context::FileContext;
use crate::registry::{RegistryError, RuleRegistry};
use crate::rule::{Rule, RuleBox};
use crate::tokenizer::{PhpTokenizer, TokenizeError, Tokenizer};
use crate::types::{FailedFile, FileOutcome, FileResult, ScanReport, Violation};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while building an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// IO error resolving the project root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The rule set is invalid.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors that make a single file impossible to analyze.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read (missing, unreadable or not UTF-8).
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file could not be tokenized.
    #[error("Failed to tokenize {path}: {source}")]
    Tokenize {
        /// File that failed to tokenize.
        path: PathBuf,
        /// Tokenizer error.
        source: TokenizeError,
    },
}

impl FileError {
    /// The cause without the file path, for per-file report lines.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Io { source, .. } => source.to_string(),
            Self::Tokenize { source, .. } => source.to_string(),
        }
    }
}

/// Builder for configuring a [`LintEngine`].
#[derive(Default)]
pub struct LintEngineBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    config: Option<Config>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    parallelism: Option<usize>,
}

impl LintEngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root that reported paths are relative to.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the engine.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the default PHP tokenizer.
    #[must_use]
    pub fn tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    /// Analyzes up to `workers` files in parallel. `1` keeps the scan sequential.
    #[must_use]
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    /// Builds the engine.
    ///
    /// Rules disabled in the configuration are dropped here.
    ///
    /// # Errors
    ///
    /// Returns an error if two rules share a name, the current directory
    /// cannot be resolved, or the worker pool fails to start.
    pub fn build(self) -> Result<LintEngine, EngineError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let config = self.config.unwrap_or_default();

        let mut configured: Vec<&String> = config
            .rules
            .keys()
            .filter(|name| !self.rules.iter().any(|rule| rule.name() == name.as_str()))
            .collect();
        configured.sort();
        for name in configured {
            warn!("Configuration names unknown rule: {name}");
        }

        let rules: Vec<RuleBox> = self
            .rules
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();
        let registry = RuleRegistry::new(rules)?;

        let workers = self.parallelism.or(config.scan.parallelism).unwrap_or(1);
        let pool = if workers > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()?,
            )
        } else {
            None
        };

        Ok(LintEngine {
            root,
            registry,
            tokenizer: self.tokenizer.unwrap_or_else(|| Box::new(PhpTokenizer::new())),
            config,
            pool,
        })
    }
}

/// Drives tokenization and rule dispatch over a set of files.
///
/// Use [`LintEngine::builder()`] to construct an instance.
pub struct LintEngine {
    root: PathBuf,
    registry: RuleRegistry,
    tokenizer: Box<dyn Tokenizer>,
    config: Config,
    pool: Option<rayon::ThreadPool>,
}

impl LintEngine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> LintEngineBuilder {
        LintEngineBuilder::new()
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the active rules.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Scans `files` and returns the aggregate report.
    pub fn run<I>(&self, files: I) -> ScanReport
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.run_with_progress(files, |_| {})
    }

    /// Scans `files`, calling `on_file` as each outcome joins the report.
    ///
    /// Outcomes are always reported and merged in the order of `files`, also
    /// when a worker pool analyzes them out of order. A file that fails to
    /// read or tokenize is recorded as failed and the scan moves on.
    pub fn run_with_progress<I, F>(&self, files: I, mut on_file: F) -> ScanReport
    where
        I: IntoIterator<Item = PathBuf>,
        F: FnMut(&FileOutcome),
    {
        info!(
            "Starting scan at {} with {} rule(s)",
            self.root.display(),
            self.registry.len()
        );

        let mut report = ScanReport::new();

        if let Some(pool) = &self.pool {
            let files: Vec<PathBuf> = files.into_iter().collect();
            debug!(
                "Analyzing {} file(s) on {} worker(s)",
                files.len(),
                pool.current_num_threads()
            );
            let outcomes: Vec<FileOutcome> =
                pool.install(|| files.par_iter().map(|p| self.lint_path(p)).collect());
            for outcome in outcomes {
                on_file(&outcome);
                report.push(outcome);
            }
        } else {
            for path in files {
                let outcome = self.lint_path(&path);
                on_file(&outcome);
                report.push(outcome);
            }
        }

        info!(
            "Scan complete: {} error(s), {} warning(s) in {} file(s), {} failed",
            report.error_count(),
            report.warning_count(),
            report.files_checked(),
            report.failed().len()
        );

        report
    }

    /// Analyzes one file, turning failures into a failed outcome.
    #[must_use]
    pub fn lint_path(&self, path: &Path) -> FileOutcome {
        match self.lint_file(path) {
            Ok(result) => FileOutcome::Analyzed(result),
            Err(err) => {
                warn!("{err}");
                FileOutcome::Failed(FailedFile {
                    path: self.relative(path),
                    reason: err.reason(),
                })
            }
        }
    }

    /// Reads and analyzes one file.
    ///
    /// # Errors
    ///
    /// Returns [`FileError`] if the file cannot be read or tokenized.
    pub fn lint_file(&self, path: &Path) -> Result<FileResult, FileError> {
        debug!("Analyzing: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.lint_source(path, &content)
    }

    /// Analyzes `source` as if it were the contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Tokenize`] if the source cannot be tokenized.
    pub fn lint_source(&self, path: &Path, source: &str) -> Result<FileResult, FileError> {
        let tokens = self
            .tokenizer
            .tokenize(source)
            .map_err(|source| FileError::Tokenize {
                path: path.to_path_buf(),
                source,
            })?;

        // the context, and with it every per-file cache, ends with this call
        let ctx = FileContext::new(path, source, &self.root);
        let mut result = FileResult::new(ctx.relative_path.clone());

        for token in &tokens {
            if !self.registry.is_interested(token.kind) {
                continue;
            }
            for rule in self.registry.rules_for(token.kind) {
                let violations = rule.evaluate(&ctx, &tokens, token.index);
                result
                    .violations
                    .extend(self.apply_severity_override(rule.name(), violations));
            }
        }

        debug!(
            "{}: {} violation(s)",
            result.path.display(),
            result.violations.len()
        );
        Ok(result)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}

impl std::fmt::Debug for LintEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintEngine")
            .field("root", &self.root)
            .field("registry", &self.registry)
            .field("parallel", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenKind, TokenStream};
    use crate::types::{ProgressMarker, Severity};
    use std::fs;

    /// Reports every variable; warnings for `$warn`, errors otherwise.
    struct Variables;

    impl Rule for Variables {
        fn name(&self) -> &'static str {
            "Test.Variables"
        }
        fn interested_kinds(&self) -> &'static [TokenKind] {
            &[TokenKind::Variable]
        }
        fn evaluate(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Vec<Violation> {
            let Some(token) = tokens.get(position) else {
                return Vec::new();
            };
            let severity = if token.content == "$warn" {
                Severity::Warning
            } else {
                Severity::Error
            };
            vec![Violation::new(
                "Found",
                self.name(),
                severity,
                ctx.location(token),
                format!("variable {}", token.content),
            )]
        }
    }

    /// Reports the open tag once.
    struct OpenTag;

    impl Rule for OpenTag {
        fn name(&self) -> &'static str {
            "Test.OpenTag"
        }
        fn interested_kinds(&self) -> &'static [TokenKind] {
            &[TokenKind::OpenTag, TokenKind::Variable]
        }
        fn evaluate(&self, ctx: &FileContext, tokens: &TokenStream, position: usize) -> Vec<Violation> {
            match tokens.get(position) {
                Some(token) if token.kind == TokenKind::OpenTag => vec![Violation::new(
                    "Open",
                    self.name(),
                    Severity::Warning,
                    ctx.location(token),
                    "open tag",
                )],
                _ => Vec::new(),
            }
        }
    }

    fn engine(root: &Path) -> LintEngine {
        LintEngine::builder()
            .root(root)
            .rule(Variables)
            .rule(OpenTag)
            .build()
            .expect("engine")
    }

    #[test]
    fn violations_follow_token_then_registration_order() {
        let engine = engine(Path::new("/project"));
        let result = engine
            .lint_source(Path::new("/project/src/a.php"), "<?php $a; $warn;")
            .expect("lint");

        let ids: Vec<_> = result.violations.iter().map(Violation::rule_id).collect();
        assert_eq!(
            ids,
            vec!["Test.OpenTag.Open", "Test.Variables.Found", "Test.Variables.Found"]
        );
        assert_eq!(result.path, PathBuf::from("src/a.php"));
        assert_eq!(result.marker(), ProgressMarker::Error);
    }

    #[test]
    fn failed_files_do_not_abort_the_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("bad.php"), "<?php $a = 'oops").expect("write");
        fs::write(dir.path().join("good.php"), "<?php $warn;").expect("write");

        let engine = engine(dir.path());
        let mut markers = String::new();
        let report = engine.run_with_progress(
            vec![
                dir.path().join("bad.php"),
                dir.path().join("missing.php"),
                dir.path().join("good.php"),
            ],
            |outcome| markers.push(outcome.marker().as_char()),
        );

        assert_eq!(markers, "FFW");
        assert_eq!(report.failed().len(), 2);
        assert_eq!(report.failed()[0].path, PathBuf::from("bad.php"));
        assert!(report.failed()[0].reason.contains("unterminated string"));
        assert_eq!(report.files().len(), 1);
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 2);
    }

    #[test]
    fn disabled_rules_are_dropped_and_overrides_applied() {
        let config = Config::parse(
            r#"
[rules."Test.OpenTag"]
enabled = false

[rules."Test.Variables"]
severity = "warning"
"#,
        )
        .expect("config");

        let engine = LintEngine::builder()
            .root("/project")
            .rule(Variables)
            .rule(OpenTag)
            .config(config)
            .build()
            .expect("engine");

        assert_eq!(engine.registry().len(), 1);
        let result = engine
            .lint_source(Path::new("/project/a.php"), "<?php $a;")
            .expect("lint");
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity, Severity::Warning);
    }

    #[test]
    fn parallel_run_matches_sequential_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut files = Vec::new();
        for i in 0..12 {
            let path = dir.path().join(format!("f{i:02}.php"));
            let body = if i % 3 == 0 { "<?php $a;" } else { "<?php $warn;" };
            fs::write(&path, body).expect("write");
            files.push(path);
        }

        let sequential = engine(dir.path()).run(files.clone());
        let parallel = LintEngine::builder()
            .root(dir.path())
            .rule(Variables)
            .rule(OpenTag)
            .parallelism(4)
            .build()
            .expect("engine")
            .run(files);

        assert_eq!(sequential.files(), parallel.files());
        assert_eq!(sequential.error_count(), parallel.error_count());
        assert_eq!(sequential.warning_count(), parallel.warning_count());
    }

    #[test]
    fn duplicate_rules_fail_to_build() {
        let err = LintEngine::builder()
            .rule(Variables)
            .rule(Variables)
            .build()
            .expect_err("duplicate");
        assert!(matches!(err, EngineError::Registry(_)));
    }

    /// Rejects every source.
    struct Rejecting;

    impl Tokenizer for Rejecting {
        fn tokenize(&self, _source: &str) -> Result<TokenStream, TokenizeError> {
            Err(TokenizeError::Unterminated {
                what: "heredoc",
                line: 7,
            })
        }
    }

    #[test]
    fn custom_tokenizer_replaces_php() {
        let engine = LintEngine::builder()
            .root("/project")
            .rule(Variables)
            .tokenizer(Rejecting)
            .build()
            .expect("engine");

        let err = engine
            .lint_source(Path::new("/project/a.php"), "<?php $a;")
            .expect_err("rejected");
        assert!(matches!(err, FileError::Tokenize { .. }));
        assert_eq!(err.reason(), "unterminated heredoc starting on line 7");
    }

    #[test]
    fn empty_scan_is_clean() {
        let report = engine(Path::new("/project")).run(Vec::new());
        assert!(report.is_clean());
        assert_eq!(report.files_checked(), 0);
    }
}
