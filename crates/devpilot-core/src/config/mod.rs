//! Data-only engine configuration.
//!
//! Configuration is plain JSON: pattern rules per locale, the recipe
//! dictionary and the command registry. It is parsed once at startup into
//! an immutable [`EngineConfig`].
//!
//! The built-in defaults are embedded in the crate. A user file is layered
//! on top of them:
//! - recipes and commands override by name
//! - pattern rules are prepended to their locale list
//! - settings fields present in the user file win

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::engine::{Locale, PatternRule, PatternSet};
use crate::paths::{ConfigLocation, ConfigSource};
use crate::ports::HandlerRef;

/// Built-in configuration shipped with the crate.
pub const BUILTIN_CONFIG: &str = include_str!("defaults.json");

/// Default maximum nesting depth for re-entrant recipe execution.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Name of the single registry entry allowed to have no handler.
pub const HELP_COMMAND: &str = "help";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// The config file is not valid JSON for the expected shape.
    #[error("Failed to parse config {origin}: {reason}")]
    Parse { origin: String, reason: String },

    /// A pattern rule's regular expression does not compile.
    #[error("Invalid pattern in rule '{id}': {reason}")]
    InvalidPattern { id: String, reason: String },

    /// A pattern rule has zero or several actions.
    #[error("Invalid rule '{id}': {reason}")]
    InvalidRule { id: String, reason: String },

    /// A registry entry has no handler but is not `help`.
    #[error("Command '{0}' has no handler (only 'help' may be null)")]
    MissingHandler(String),

    /// Settings are out of range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Template extractor as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractTemplate {
    pub command: String,
    /// Argument name to `$1` / `${name}` template.
    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

/// A pattern rule as written in configuration.
///
/// Exactly one of `recipe`, `command` or `extract` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternRuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractTemplate>,
}

/// Pattern rules grouped by locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternsConfig {
    pub secondary: Vec<PatternRuleConfig>,
    pub primary: Vec<PatternRuleConfig>,
}

/// Settings as written in configuration; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    pub max_depth: Option<usize>,
}

/// Configuration document before compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    pub settings: SettingsConfig,
    pub patterns: PatternsConfig,
    pub recipes: BTreeMap<String, Vec<String>>,
    pub commands: BTreeMap<String, Option<HandlerRef>>,
}

impl RawConfig {
    /// Parse a JSON document. `origin` is used in error messages.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// The embedded defaults.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::parse(BUILTIN_CONFIG, "built-in defaults")
    }

    /// Layer `overlay` on top of `self`.
    #[must_use]
    pub fn layer(mut self, overlay: Self) -> Self {
        if overlay.settings.max_depth.is_some() {
            self.settings.max_depth = overlay.settings.max_depth;
        }

        let mut secondary = overlay.patterns.secondary;
        secondary.append(&mut self.patterns.secondary);
        self.patterns.secondary = secondary;

        let mut primary = overlay.patterns.primary;
        primary.append(&mut self.patterns.primary);
        self.patterns.primary = primary;

        self.recipes.extend(overlay.recipes);
        self.commands.extend(overlay.commands);
        self
    }
}

/// Effective engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineSettings {
    /// Maximum nesting of recipe-within-recipe execution.
    pub max_depth: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineSettings {
    fn from_config(config: &SettingsConfig) -> Result<Self, ConfigError> {
        let max_depth = config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        if max_depth == 0 {
            return Err(ConfigError::InvalidSettings(
                "max_depth must be at least 1".into(),
            ));
        }
        Ok(Self { max_depth })
    }
}

/// Compiled, immutable configuration used by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub settings: EngineSettings,
    pub patterns: PatternSet,
    /// Recipe name to ordered step list.
    pub recipes: BTreeMap<String, Vec<String>>,
    /// Command name to handler reference; `None` only for `help`.
    pub commands: BTreeMap<String, Option<HandlerRef>>,
}

impl EngineConfig {
    /// Compile a raw document, validating every rule and registry entry.
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let settings = EngineSettings::from_config(&raw.settings)?;

        let secondary = compile_rules(&raw.patterns.secondary, Locale::Secondary)?;
        let primary = compile_rules(&raw.patterns.primary, Locale::Primary)?;

        if let Some((name, _)) = raw
            .commands
            .iter()
            .find(|(name, handler)| handler.is_none() && name.as_str() != HELP_COMMAND)
        {
            return Err(ConfigError::MissingHandler(name.clone()));
        }

        Ok(Self {
            settings,
            patterns: PatternSet::new(secondary, primary),
            recipes: raw.recipes,
            commands: raw.commands,
        })
    }

    /// Built-in defaults only.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_raw(RawConfig::builtin()?)
    }

    /// Built-in defaults layered with the file at `location`, if any.
    pub fn load(location: &ConfigLocation) -> Result<Self, ConfigError> {
        let mut raw = RawConfig::builtin()?;
        if location.source != ConfigSource::Defaults {
            if let Some(path) = &location.path {
                debug!(path = %path.display(), source = ?location.source, "Loading user config");
                raw = raw.layer(RawConfig::from_file(path)?);
            }
        }
        Self::from_raw(raw)
    }

    pub fn recipe(&self, name: &str) -> Option<&[String]> {
        self.recipes.get(name).map(Vec::as_slice)
    }

    pub fn has_recipe(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    /// Registry lookup. `Some(None)` is the handler-less `help` entry.
    pub fn command(&self, name: &str) -> Option<Option<&HandlerRef>> {
        self.commands.get(name).map(Option::as_ref)
    }
}

fn compile_rules(
    configs: &[PatternRuleConfig],
    locale: Locale,
) -> Result<Vec<PatternRule>, ConfigError> {
    configs
        .iter()
        .enumerate()
        .map(|(index, config)| PatternRule::compile(config, locale, index))
        .collect()
}
