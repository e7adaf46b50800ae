use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PathWardenError;

pub const DEFAULT_RULES_FILE: &str = "llm_approvements.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub rules: RulesConfig,
    pub display: DisplayConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RulesConfig {
    /// Name of the rule file searched for under the project root.
    pub file_name: String,
    /// Globs skipped while locating the rule file or scanning a tree.
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    pub allow_badge: String,
    pub deny_badge: String,
    pub allow_tooltip: String,
    pub deny_tooltip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchConfig {
    pub debounce_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            rules: RulesConfig {
                file_name: DEFAULT_RULES_FILE.to_string(),
                exclude: vec!["**/node_modules/**".to_string(), "**/.git/**".to_string()],
            },
            display: DisplayConfig::default(),
            watch: WatchConfig { debounce_ms: 200 },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default_config());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), PathWardenError> {
        let file_name = self.rules.file_name.trim();
        if file_name.is_empty() {
            return Err(PathWardenError::InvalidConfig(
                "rules.file_name must not be empty".to_string(),
            ));
        }
        if file_name.contains(&['/', '\\'][..]) {
            return Err(PathWardenError::InvalidConfig(format!(
                "rules.file_name must be a bare file name, got '{file_name}'"
            )));
        }
        Ok(())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            allow_badge: "✅".to_string(),
            deny_badge: "❌".to_string(),
            allow_tooltip: "LLM: Allowed".to_string(),
            deny_tooltip: "LLM: Denied".to_string(),
        }
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "pathwarden", "pathwarden")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        Ok(Self {
            config_path: project_dirs.config_dir().join("config.toml"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default_config();
        let text = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.rules.file_name, "llm_approvements.json");
    }

    #[test]
    fn rejects_nested_rule_file_name() {
        let text = r#"
[rules]
file_name = "config/llm_approvements.json"
exclude = []

[display]
allow_badge = "A"
deny_badge = "D"
allow_tooltip = "allowed"
deny_tooltip = "denied"

[watch]
debounce_ms = 50
"#;
        let err = Config::from_toml_str(text).unwrap_err();
        assert!(err.to_string().contains("bare file name"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default_config();
        config.watch.debounce_ms = 500;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.watch.debounce_ms, 500);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default_config());
    }
}
