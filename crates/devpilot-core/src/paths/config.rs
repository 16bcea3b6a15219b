//! Config file discovery.
//!
//! Resolution order:
//! 1. Explicit path (`--config`)
//! 2. `DEVPILOT_CONFIG` environment variable
//! 3. `.devpilot.json` in the working directory, if present
//! 4. `<user config dir>/devpilot/config.json`, if present
//! 5. Built-in defaults only

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "DEVPILOT_CONFIG";

/// Per-project config file name.
pub const LOCAL_CONFIG_FILE: &str = ".devpilot.json";

/// How the config file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag.
    Explicit,
    /// `DEVPILOT_CONFIG`.
    EnvVar,
    /// `.devpilot.json` in the working directory.
    Project,
    /// Per-user config directory.
    User,
    /// No file; built-in defaults only.
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Explicit => "--config flag",
            Self::EnvVar => CONFIG_ENV_VAR,
            Self::Project => "project file",
            Self::User => "user config",
            Self::Defaults => "built-in defaults",
        };
        f.write_str(label)
    }
}

/// Resolution result for the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// `None` when only the built-in defaults apply.
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

impl ConfigLocation {
    pub const fn defaults() -> Self {
        Self {
            path: None,
            source: ConfigSource::Defaults,
        }
    }
}

/// Per-user config file location (`~/.config/devpilot/config.json` on Linux).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("devpilot").join("config.json"))
}

/// Resolve the config file using the process environment.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<ConfigLocation, PathError> {
    let cwd = env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?;
    let env_value = env::var(CONFIG_ENV_VAR).ok();
    resolve_config_path_from(explicit, env_value.as_deref(), &cwd, user_config_path())
}

/// Pure resolver used by [`resolve_config_path`] and tests.
///
/// Explicit and environment paths must exist; discovered paths are skipped
/// when missing.
pub fn resolve_config_path_from(
    explicit: Option<&Path>,
    env_value: Option<&str>,
    cwd: &Path,
    user_path: Option<PathBuf>,
) -> Result<ConfigLocation, PathError> {
    if let Some(path) = explicit {
        let path = normalize_user_path(path, cwd)?;
        return require_existing(path, ConfigSource::Explicit);
    }

    if let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) {
        let path = normalize_user_path(Path::new(raw.trim()), cwd)?;
        return require_existing(path, ConfigSource::EnvVar);
    }

    let project = cwd.join(LOCAL_CONFIG_FILE);
    if project.is_file() {
        return Ok(ConfigLocation {
            path: Some(project),
            source: ConfigSource::Project,
        });
    }

    if let Some(user) = user_path.filter(|p| p.is_file()) {
        return Ok(ConfigLocation {
            path: Some(user),
            source: ConfigSource::User,
        });
    }

    Ok(ConfigLocation::defaults())
}

fn require_existing(path: PathBuf, source: ConfigSource) -> Result<ConfigLocation, PathError> {
    if !path.is_file() {
        return Err(PathError::NotFound(path));
    }
    Ok(ConfigLocation {
        path: Some(path),
        source,
    })
}

/// Expand `~` and make relative paths absolute against `cwd`.
fn normalize_user_path(raw: &Path, cwd: &Path) -> Result<PathBuf, PathError> {
    let Some(text) = raw.to_str() else {
        return Ok(cwd.join(raw));
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed == "~" || trimmed.starts_with("~/") {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        match trimmed.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => home,
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(cwd.join(expanded))
    }
}
