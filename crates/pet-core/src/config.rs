use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::explorer::{AdoptedListPolicy, Appearance, ListLayout};
use super::platform;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the pet catalog comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML catalog replacing the built-in one. Unset means built-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub appearance: Appearance,
    /// Keep a single Adopted row per pet when a pet is adopted again.
    #[serde(default)]
    pub dedupe_adopted: bool,
    #[serde(default)]
    pub start_collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_show_keys")]
    pub show_keys: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            show_keys: default_show_keys(),
        }
    }
}

fn default_tick_ms() -> u64 {
    100
}

fn default_show_keys() -> bool {
    true
}

impl ExplorerConfig {
    pub fn layout(&self) -> ListLayout {
        ListLayout {
            appearance: self.appearance,
            collapsible_headers: true,
        }
    }

    pub fn policy(&self) -> AdoptedListPolicy {
        if self.dedupe_adopted {
            AdoptedListPolicy::Dedupe
        } else {
            AdoptedListPolicy::AppendAlways
        }
    }
}

impl Config {
    /// Load from the default location, writing a default file on first run.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.catalog.path.is_none());
        assert_eq!(config.explorer.appearance, Appearance::Grouped);
        assert_eq!(config.explorer.policy(), AdoptedListPolicy::AppendAlways);
        assert_eq!(config.ui.tick_ms, 100);
        assert!(config.ui.show_keys);
        assert!(Config::config_path().ends_with("pet-explorer/config.toml"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [explorer]
            appearance = "plain"
            dedupe_adopted = true
            "#,
        )
        .unwrap();
        assert_eq!(config.explorer.layout().appearance, Appearance::Plain);
        assert_eq!(config.explorer.policy(), AdoptedListPolicy::Dedupe);
        assert!(!config.explorer.start_collapsed);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.catalog.path = Some(PathBuf::from("/tmp/pets.toml"));
        config.ui.show_keys = false;

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
