//! Ordered, kind-indexed set of active rules.

use crate::rule::{Rule, RuleBox};
use crate::token::TokenKind;

use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised while assembling a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two rules share a name.
    #[error("rule `{0}` is registered more than once")]
    DuplicateRule(String),
}

/// The active rules, indexed by the token kinds they listen for.
///
/// Built once before a scan and read-only afterwards. Within each kind,
/// rules keep their registration order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<RuleBox>,
    by_kind: HashMap<TokenKind, Vec<usize>>,
}

impl RuleRegistry {
    /// Builds a registry from rules in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRule`] if two rules share a name.
    pub fn new(rules: Vec<RuleBox>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut by_kind: HashMap<TokenKind, Vec<usize>> = HashMap::new();

        for (index, rule) in rules.iter().enumerate() {
            if !seen.insert(rule.name()) {
                return Err(RegistryError::DuplicateRule(rule.name().to_string()));
            }
            for kind in rule.interested_kinds() {
                let slot = by_kind.entry(*kind).or_default();
                if !slot.contains(&index) {
                    slot.push(index);
                }
            }
        }

        Ok(Self { rules, by_kind })
    }

    /// Rules interested in `kind`, in registration order.
    pub fn rules_for(&self, kind: TokenKind) -> impl Iterator<Item = &dyn Rule> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.rules.get(i))
            .map(|rule| rule.as_ref())
    }

    /// Returns true if any rule listens for `kind`.
    #[must_use]
    pub fn is_interested(&self, kind: TokenKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// All rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.iter().map(Rule::name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileContext;
    use crate::token::TokenStream;
    use crate::types::Violation;

    struct Named(&'static str, &'static [TokenKind]);

    impl Rule for Named {
        fn name(&self) -> &'static str {
            self.0
        }
        fn interested_kinds(&self) -> &'static [TokenKind] {
            self.1
        }
        fn evaluate(&self, _: &FileContext, _: &TokenStream, _: usize) -> Vec<Violation> {
            Vec::new()
        }
    }

    fn named(name: &'static str, kinds: &'static [TokenKind]) -> RuleBox {
        Box::new(Named(name, kinds))
    }

    #[test]
    fn indexes_by_kind_in_registration_order() {
        let registry = RuleRegistry::new(vec![
            named("A", &[TokenKind::Function, TokenKind::Class]),
            named("B", &[TokenKind::OpenTag]),
            named("C", &[TokenKind::Function]),
        ])
        .expect("registry");

        let names: Vec<_> = registry.rules_for(TokenKind::Function).map(Rule::name).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(registry.is_interested(TokenKind::Class));
        assert!(!registry.is_interested(TokenKind::Variable));
        assert_eq!(registry.rules_for(TokenKind::Variable).count(), 0);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_kinds_register_once() {
        let registry =
            RuleRegistry::new(vec![named("A", &[TokenKind::Function, TokenKind::Function])])
        .expect("registry");
        assert_eq!(registry.rules_for(TokenKind::Function).count(), 1);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = RuleRegistry::new(vec![
            named("A", &[TokenKind::Function]),
            named("A", &[TokenKind::Class]),
        ])
        .expect_err("duplicate");
        assert_eq!(err, RegistryError::DuplicateRule("A".to_string()));
    }
}
