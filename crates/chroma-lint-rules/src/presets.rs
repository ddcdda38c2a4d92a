//! Rule presets for common configurations.

use crate::{ClassComment, FunctionComment, FunctionName, MatchingCase, OpeningFunctionBrace};
use chroma_lint_core::{Config, ConfigError, RuleBox};

use std::str::FromStr;

/// Preset configurations for chroma-lint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    /// All Chroma sniffs.
    #[default]
    Recommended,
    /// Function doc comments and brace placement only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset with default options.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        self.configured_rules(&Config::default())
    }

    /// Returns the rules for this preset, reading rule options from `config`.
    #[must_use]
    pub fn configured_rules(self, config: &Config) -> Vec<RuleBox> {
        let function_comment =
            FunctionComment::from_config(config.rule_config(crate::function_comment::NAME));
        match self {
            Self::Recommended => vec![
                Box::new(function_comment),
                Box::new(ClassComment::new()),
                Box::new(OpeningFunctionBrace::new()),
                Box::new(FunctionName::new()),
                Box::new(MatchingCase::new()),
            ],
            Self::Minimal => vec![
                Box::new(function_comment),
                Box::new(OpeningFunctionBrace::new()),
            ],
        }
    }

    /// The preset named by `config`, [`Preset::Recommended`] when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] for an unrecognized name.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config
            .preset
            .as_deref()
            .map_or(Ok(Self::default()), str::parse::<Self>)
    }

    /// Lower-case name as used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Minimal => "minimal",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "minimal" => Ok(Self::Minimal),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes, in registration order:
/// - `Chroma.Commenting.FunctionComment`
/// - `Chroma.Commenting.ClassComment`
/// - `Chroma.Functions.OpeningFunctionBrace`
/// - `Chroma.NamingConventions.FunctionName`
/// - `Chroma.Files.MatchingCase`
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns the minimal set of rules.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules()
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    recommended_rules()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_lint_core::Rule;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(
            names(&recommended_rules()),
            vec![
                "Chroma.Commenting.FunctionComment",
                "Chroma.Commenting.ClassComment",
                "Chroma.Functions.OpeningFunctionBrace",
                "Chroma.NamingConventions.FunctionName",
                "Chroma.Files.MatchingCase",
            ]
        );
        assert_eq!(
            names(&minimal_rules()),
            vec![
                "Chroma.Commenting.FunctionComment",
                "Chroma.Functions.OpeningFunctionBrace",
            ]
        );
    }

    #[test]
    fn preset_from_config() {
        assert_eq!(Preset::from_config(&Config::default()).ok(), Some(Preset::Recommended));

        let config = Config::parse("preset = \"Minimal\"\n").expect("config");
        assert_eq!(Preset::from_config(&config).ok(), Some(Preset::Minimal));

        let config = Config::parse("preset = \"strict\"\n").expect("config");
        assert!(matches!(
            Preset::from_config(&config),
            Err(ConfigError::UnknownPreset(name)) if name == "strict"
        ));
    }
}
