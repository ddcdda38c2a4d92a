//! # chroma-lint-core
//!
//! Core framework for linting PHP sources against token-pattern rules.
//!
//! This crate provides the pieces a linter is assembled from:
//!
//! - [`PhpTokenizer`] producing a [`TokenStream`] per file
//! - [`Rule`] trait for token-triggered checks ("sniffs")
//! - [`RuleRegistry`] indexing rules by the token kinds they listen for
//! - [`FileScanner`] for deterministic file discovery
//! - [`LintEngine`] for per-file dispatch into a [`ScanReport`]
//! - [`ReportRenderer`] for the grouped text report and exit code
//!
//! ## Example
//!
//! ```ignore
//! use chroma_lint_core::{FileScanner, LintEngine, ReportRenderer, RootDirectories};
//!
//! let engine = LintEngine::builder()
//!     .root(".")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let roots = RootDirectories::existing_enforceable(engine.root());
//! let scanner = FileScanner::new("*.php", &["*Sniff.php"])?;
//! let report = engine.run(scanner.scan(&roots));
//!
//! let rendered = ReportRenderer::new().render(&report);
//! print!("{}", rendered.text);
//! std::process::exit(rendered.exit_code);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod engine;
mod registry;
mod report;
mod roots;
mod rule;
mod scanner;
mod token;
mod tokenizer;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use config::{Config, ConfigError, RuleConfig, ScanConfig};
pub use context::FileContext;
pub use engine::{EngineError, FileError, LintEngine, LintEngineBuilder};
pub use registry::{RegistryError, RuleRegistry};
pub use report::{Rendered, ReportRenderer, SUCCESS_BANNER};
pub use roots::RootDirectories;
pub use rule::{Rule, RuleBox};
pub use scanner::FileScanner;
pub use token::{Token, TokenKind, TokenStream};
pub use tokenizer::{PhpTokenizer, TokenizeError, Tokenizer};
pub use types::{
    FailedFile, FileOutcome, FileResult, Location, ProgressMarker, ScanReport, Severity,
    Violation, ViolationDiagnostic,
};
