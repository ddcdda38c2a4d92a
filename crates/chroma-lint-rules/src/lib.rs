//! # chroma-lint-rules
//!
//! Built-in Chroma sniffs for chroma-lint.
//!
//! Each sniff listens for one or more token kinds and reports violations
//! under its dotted name, e.g. `Chroma.Functions.OpeningFunctionBrace.BraceOnSameLine`.
//!
//! ## Available Rules
//!
//! | Name | Triggered on | Description |
//! |------|--------------|-------------|
//! | `Chroma.Commenting.FunctionComment` | `function` | Doc comment presence, tags and parameter names |
//! | `Chroma.Commenting.ClassComment` | `class`, `interface`, `trait` | Class doc comment with `@author` and `@package` |
//! | `Chroma.Functions.OpeningFunctionBrace` | `function` | Opening brace on the line after the declaration |
//! | `Chroma.NamingConventions.FunctionName` | `function` | `snake_case` names, `__` only for magic methods |
//! | `Chroma.Files.MatchingCase` | `<?php` | File named after the class it declares |
//!
//! ## Usage
//!
//! ```ignore
//! use chroma_lint_core::LintEngine;
//! use chroma_lint_rules::{FunctionComment, OpeningFunctionBrace};
//!
//! let engine = LintEngine::builder()
//!     .root(".")
//!     .rule(FunctionComment::new())
//!     .rule(OpeningFunctionBrace::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod class_comment;
pub mod function_comment;
pub mod function_name;
pub mod matching_case;
pub mod opening_function_brace;
mod presets;

pub use class_comment::ClassComment;
pub use function_comment::FunctionComment;
pub use function_name::FunctionName;
pub use matching_case::MatchingCase;
pub use opening_function_brace::OpeningFunctionBrace;
pub use presets::{all_rules, minimal_rules, recommended_rules, Preset};

/// Re-export core types for convenience.
pub use chroma_lint_core::{Rule, Severity, Violation};
