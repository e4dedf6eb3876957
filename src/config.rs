//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/listtree/listtree.toml`
//! 3. Local config: `<dir>/.listtree.toml` (working directory or `-C`)
//! 4. Environment variables: `LISTTREE_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{FieldConfig, PartialFieldConfig};

pub const DEFAULT_LABEL_FIELD: &str = "name";
pub const DEFAULT_EXPAND_DEPTH: i64 = 2;

/// Unified configuration for listtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Record field names (id, parent id, children)
    pub fields: FieldConfig,
    /// Field shown for each node when rendering trees
    pub label: String,
    /// Levels to expand when collecting expansion keys
    pub expand_depth: i64,
    /// Field ordering siblings after a build (none keeps input order)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Reject duplicate identifiers and cycles instead of resolving them
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fields: FieldConfig::default(),
            label: DEFAULT_LABEL_FIELD.into(),
            expand_depth: DEFAULT_EXPAND_DEPTH,
            sort_by: None,
            strict: false,
        }
    }
}

/// Raw settings for intermediate parsing (every value optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub fields: PartialFieldConfig,
    pub label: Option<String>,
    pub expand_depth: Option<i64>,
    pub sort_by: Option<String>,
    pub strict: Option<bool>,
}

/// Get the XDG config directory for listtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "listtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("listtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".listtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it is set, otherwise keep self.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            fields: self.fields.with_overrides(&overlay.fields),
            label: overlay.label.clone().unwrap_or_else(|| self.label.clone()),
            expand_depth: overlay.expand_depth.unwrap_or(self.expand_depth),
            sort_by: overlay.sort_by.clone().or_else(|| self.sort_by.clone()),
            strict: overlay.strict.unwrap_or(self.strict),
        }
    }

    /// Field overrides as a partial config for the domain operations.
    pub fn field_overrides(&self) -> PartialFieldConfig {
        PartialFieldConfig {
            id: Some(self.fields.id.clone()),
            pid: Some(self.fields.pid.clone()),
            children: Some(self.fields.children.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.listtree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Load a single file on top of the defaults, ignoring other layers.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Apply LISTTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        settings.merge_env(env_source())
    }

    /// Overlay values from an environment source (see [`env_source`]).
    pub fn merge_env(mut self, source: Environment) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("fields.id") {
            self.fields.id = val;
        }
        if let Ok(val) = config.get_string("fields.pid") {
            self.fields.pid = val;
        }
        if let Ok(val) = config.get_string("fields.children") {
            self.fields.children = val;
        }
        if let Ok(val) = config.get_string("label") {
            self.label = val;
        }
        if let Ok(val) = config.get_int("expand_depth") {
            self.expand_depth = val;
        }
        if let Ok(val) = config.get_string("sort_by") {
            self.sort_by = Some(val);
        }
        if let Ok(val) = config.get_bool("strict") {
            self.strict = val;
        }

        Ok(self)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# listtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/listtree/listtree.toml
#   Local:  <dir>/.listtree.toml
#   Env:    LISTTREE_* environment variables (e.g. LISTTREE_FIELDS__PID=parent)

# Field shown for each node by `listtree tree`
# label = "name"

# Levels collected by `listtree expand` (roots are level 1)
# expand_depth = 2

# Order siblings by this field after building
# sort_by = "order"

# Reject duplicate identifiers and parent cycles
# strict = false

[fields]
# id = "id"
# pid = "parentId"
# children = "children"
"#
        .to_string()
    }
}

/// `LISTTREE_` prefix, `__` between nested keys: `LISTTREE_FIELDS__PID`, `LISTTREE_EXPAND_DEPTH`.
pub fn env_source() -> Environment {
    Environment::with_prefix("LISTTREE")
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_uses_standard_field_names() {
        let settings = Settings::default();
        assert_eq!(settings.fields, FieldConfig::default());
        assert_eq!(settings.label, "name");
        assert_eq!(settings.expand_depth, 2);
        assert!(settings.sort_by.is_none());
        assert!(!settings.strict);
    }

    #[test]
    fn given_raw_overlay_when_merging_then_only_specified_values_change() {
        let raw: RawSettings = toml::from_str(
            r#"
expand_depth = 3
sort_by = "order"

[fields]
pid = "parent"
"#,
        )
        .unwrap();

        let merged = Settings::default().merge_with(&raw);

        assert_eq!(merged.expand_depth, 3);
        assert_eq!(merged.sort_by.as_deref(), Some("order"));
        assert_eq!(merged.fields.pid, "parent");
        assert_eq!(merged.fields.id, "id");
        assert_eq!(merged.label, "name");
    }

    #[test]
    fn given_template_when_parsing_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_through_raw() {
        let settings = Settings {
            sort_by: Some("order".into()),
            strict: true,
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
