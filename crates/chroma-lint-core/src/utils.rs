//! Token-pattern helpers shared by rule implementations.

pub mod declarations;
pub mod docblock;
pub mod imports;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use declarations::{
    comment_anchor, declaration_name, function_parts, parameter_names, FunctionParts,
};
#[doc(inline)]
pub use docblock::{DocBlock, DocLine, DocTag};
#[doc(inline)]
pub use imports::{collect_imports, namespace_of, ImportAlias};

use crate::token::Token;

/// Returns true if the token reads as an identifier.
///
/// PHP allows reserved words as method names and namespace segments, so
/// keyword tokens count as identifiers here.
#[must_use]
pub fn is_identifier(token: &Token) -> bool {
    token
        .content
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || !c.is_ascii())
}
