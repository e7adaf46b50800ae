use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pathwarden_core::config::{Config, ConfigPaths};
use pathwarden_core::error::PathWardenError;
use pathwarden_core::paths::normalize_path;
use policy_engine::{LoadSummary, PolicyEngine};

pub mod check;
pub mod config;
pub mod init;
pub mod lint;
pub mod scan;
pub mod watch;

/// The tool config from `--config`, else the per-user location, else defaults.
pub fn load_tool_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => {
            let paths = ConfigPaths::resolve()?;
            Config::load_or_default(&paths.config_path)
        }
    }
}

/// The rule file from `--rules`, else the first one found under `search_root`.
pub fn rules_file(explicit: Option<PathBuf>, config: &Config, search_root: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    monitor::locate_rules_file(search_root, &config.rules.file_name, &config.rules.exclude)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no {} found under {} (use --rules to point at one)",
                config.rules.file_name,
                search_root.display()
            )
        })
}

pub fn load_engine(rules_file: &Path) -> Result<(PolicyEngine, LoadSummary)> {
    let contents = fs::read_to_string(rules_file)
        .with_context(|| format!("read rule file {}", rules_file.display()))?;
    let engine = PolicyEngine::default();
    let summary = engine.load_str(&contents);
    Ok((engine, summary))
}

pub fn rule_source_error(rules_file: &Path, error: &str) -> anyhow::Error {
    PathWardenError::RuleSource(format!("{}: {error}", rules_file.display())).into()
}

pub fn current_dir() -> Result<PathBuf> {
    env::current_dir().context("determine current directory")
}

/// Directory the rule patterns are written against.
pub fn rules_root(rules_file: &Path) -> PathBuf {
    match rules_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Expresses a user-supplied path relative to the rules root when it points
/// inside it; anything else is passed through for the resolver to normalize.
pub fn relative_to_root(path: &str, root: &Path) -> String {
    match Path::new(path).strip_prefix(root) {
        Ok(relative) => normalize_path(&relative.to_string_lossy()),
        Err(_) => path.to_string(),
    }
}
