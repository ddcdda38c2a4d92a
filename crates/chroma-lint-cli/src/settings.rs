//! Lint settings for one project: the configuration file, the preset it
//! selects and the directories it asks to scan.
//!
//! A configuration file is looked up as `--config PATH`, then
//! `chroma-lint.toml` or `.chroma-lint.toml` in the project, then
//! `config.toml` in `$CHROMA_LINT_CONFIG_DIR` or `~/.chroma-lint/`.
//! Without one the built-in defaults apply.

use anyhow::{Context, Result};
use chroma_lint_core::{Config, RootDirectories, RuleBox};
use chroma_lint_rules::Preset;
use std::fmt;
use std::path::{Path, PathBuf};

const PROJECT_FILES: &[&str] = &["chroma-lint.toml", ".chroma-lint.toml"];
const HOME_FILE: &str = "config.toml";
const HOME_ENV: &str = "CHROMA_LINT_CONFIG_DIR";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Named with `--config`.
    Flag(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the user's chroma-lint directory.
    Home(PathBuf),
    /// No file; built-in defaults.
    BuiltIn,
}

impl Origin {
    fn file(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::Project(p) | Self::Home(p) => Some(p),
            Self::BuiltIn => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(p) => write!(f, "{} (--config)", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::Home(p) => write!(f, "{} (user)", p.display()),
            Self::BuiltIn => f.write_str("built-in defaults"),
        }
    }
}

/// Loaded configuration together with the preset it names.
#[derive(Debug)]
pub struct Settings {
    /// Parsed configuration.
    pub config: Config,
    /// Source of `config`.
    pub origin: Origin,
    /// Preset named by `preset = ...`, or the default one.
    pub preset: Preset,
}

impl Settings {
    /// Loads the settings for `project`.
    ///
    /// # Errors
    ///
    /// Fails when the chosen file cannot be read or parsed, or names an
    /// unknown preset.
    pub fn load(project: &Path, flag: Option<&Path>) -> Result<Self> {
        let origin = locate(project, flag, home_dir());
        Self::from_origin(origin)
    }

    fn from_origin(origin: Origin) -> Result<Self> {
        let config = match origin.file() {
            Some(file) => Config::from_file(file)
                .with_context(|| format!("Failed to load config: {}", file.display()))?,
            None => Config::default(),
        };
        let preset = Preset::from_config(&config)
            .with_context(|| format!("Invalid preset in {origin}"))?;
        tracing::debug!("Preset {} from {}", preset.as_str(), origin);

        Ok(Self {
            config,
            origin,
            preset,
        })
    }

    /// Directories to scan.
    ///
    /// Configured `[scan] roots` are relative to the directory of a
    /// `--config` file, and to the project otherwise. Without configured
    /// roots, the enforceable directories present in the project are used.
    #[must_use]
    pub fn roots(&self, project: &Path) -> Vec<PathBuf> {
        if self.config.scan.roots.is_empty() {
            return RootDirectories::existing_enforceable(project);
        }
        let base = match &self.origin {
            Origin::Flag(file) => file.parent().unwrap_or(project),
            _ => project,
        };
        self.config
            .scan
            .roots
            .iter()
            .map(|root| base.join(root))
            .collect()
    }

    /// Rules to run: the preset's, or those named in `filter`.
    ///
    /// Names match in full (`Chroma.Files.MatchingCase`) or by their last
    /// segment (`MatchingCase`); unknown names are logged and ignored.
    #[must_use]
    pub fn rules(&self, filter: Option<&str>) -> Vec<RuleBox> {
        let Some(filter) = filter else {
            return self.preset.configured_rules(&self.config);
        };
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        let available = Preset::Recommended.configured_rules(&self.config);

        for name in &names {
            if !available.iter().any(|rule| matches_name(rule.name(), name)) {
                tracing::warn!("Unknown rule: {}", name);
            }
        }

        available
            .into_iter()
            .filter(|rule| names.iter().any(|name| matches_name(rule.name(), name)))
            .collect()
    }
}

fn matches_name(rule: &str, requested: &str) -> bool {
    rule == requested || rule.rsplit('.').next() == Some(requested)
}

fn locate(project: &Path, flag: Option<&Path>, home: Option<PathBuf>) -> Origin {
    if let Some(file) = flag {
        return Origin::Flag(file.to_path_buf());
    }

    if let Some(file) = PROJECT_FILES
        .iter()
        .map(|name| project.join(name))
        .find(|file| file.is_file())
    {
        return Origin::Project(file);
    }

    home.map(|dir| dir.join(HOME_FILE))
        .filter(|file| file.is_file())
        .map_or(Origin::BuiltIn, Origin::Home)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".chroma-lint")))
}
