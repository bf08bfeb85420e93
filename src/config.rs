//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/roadmap/roadmap.toml`
//! 3. Environment variables: `ROADMAP_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

pub const DEFAULT_FEED_URL: &str = "https://hn.algolia.com";

/// Feed lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    /// Base URL of the Hacker News search API
    pub base_url: String,
    /// Stories requested per topic
    pub hits_per_topic: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_URL.into(),
            hits_per_topic: 5,
        }
    }
}

/// Raw feed config for intermediate parsing (None = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFeedConfig {
    pub base_url: Option<String>,
    pub hits_per_topic: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub feeds: RawFeedConfig,
}

/// Unified configuration for roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding persisted roadmaps
    pub data_dir: PathBuf,
    /// Feed lookup settings
    pub feeds: FeedConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            feeds: FeedConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "roadmap")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.roadmap"))
}

/// Get the XDG config directory for roadmap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "roadmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("roadmap.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_dir.to_string_lossy().as_ref());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Override the data directory, expanding `~` and env vars.
    pub fn set_data_dir(&mut self, dir: &Path) {
        self.data_dir = dir.to_path_buf();
        self.expand_paths();
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            feeds: FeedConfig {
                base_url: overlay
                    .feeds
                    .base_url
                    .clone()
                    .unwrap_or_else(|| self.feeds.base_url.clone()),
                hits_per_topic: overlay
                    .feeds
                    .hits_per_topic
                    .unwrap_or(self.feeds.hits_per_topic),
            },
        }
    }

    /// Load settings from defaults, the global config file and `ROADMAP_*` env vars.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using `config_path` as the config file layer.
    ///
    /// A missing file is not an error; a file that does not parse is.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply ROADMAP_* environment variables as explicit overrides.
    ///
    /// `ROADMAP_DATA_DIR`, `ROADMAP_FEEDS__BASE_URL`, `ROADMAP_FEEDS__HITS_PER_TOPIC`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("ROADMAP")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("feeds.base_url") {
            settings.feeds.base_url = val;
        }
        if let Ok(val) = config.get_int("feeds.hits_per_topic") {
            settings.feeds.hits_per_topic = usize::try_from(val).map_err(|_| {
                ApplicationError::Config {
                    message: format!("feeds.hits_per_topic must not be negative: {}", val),
                }
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# roadmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/roadmap/roadmap.toml
#   Env:    ROADMAP_* environment variables (explicit overrides)

# Directory holding persisted roadmaps
# data_dir = "~/.local/share/roadmap"

[feeds]
# Hacker News search API
# base_url = "https://hn.algolia.com"

# Stories requested per topic
# hits_per_topic = 5
"#
        .to_string()
    }
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
    fn given_no_config_file_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None).expect("load defaults");
        assert!(settings.data_dir.to_string_lossy().contains("roadmap"));
        assert!(settings.feeds.hits_per_topic > 0);
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/maps"),
            feeds: FeedConfig::default(),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.data_dir.to_string_lossy();
        assert!(dir.starts_with(&home), "data_dir should start with home: {}", dir);
        assert!(!dir.contains('~'));
    }

    #[test]
    fn given_tilde_dir_when_set_data_dir_then_expanded() {
        let mut settings = Settings::default();

        settings.set_data_dir(Path::new("~/maps"));

        let home = std::env::var("HOME").expect("HOME should be set");
        assert_eq!(settings.data_dir, PathBuf::from(home).join("maps"));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings {
            data_dir: PathBuf::from("/base"),
            feeds: FeedConfig::default(),
        };
        let overlay = RawSettings {
            data_dir: None,
            feeds: RawFeedConfig {
                base_url: None,
                hits_per_topic: Some(20),
            },
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.data_dir, PathBuf::from("/base"));
        assert_eq!(merged.feeds.base_url, DEFAULT_FEED_URL);
        assert_eq!(merged.feeds.hits_per_topic, 20);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.data_dir.is_none());
    }
}
