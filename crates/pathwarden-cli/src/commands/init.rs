use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pathwarden_core::config::{Config, ConfigPaths};
use pathwarden_core::types::RawRule;

use super::load_tool_config;

pub fn write_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => ConfigPaths::resolve()?.config_path,
    };
    ensure_writable(&config_path, force)?;
    Config::default_config().save(&config_path)?;
    println!("Config written to {}", config_path.display());
    Ok(())
}

pub fn write_example_rules(dir: &Path, config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config = load_tool_config(config_path)?;
    let rules_path = dir.join(&config.rules.file_name);
    ensure_writable(&rules_path, force)?;

    let contents = serde_json::to_string_pretty(&example_rules()).context("render example rules")?;
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    fs::write(&rules_path, contents)
        .with_context(|| format!("write rule file {}", rules_path.display()))?;
    println!("Example rules written to {}", rules_path.display());
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}

fn example_rules() -> Vec<RawRule> {
    vec![
        RawRule::new("src", "allow").with_comment("Application sources"),
        RawRule::new("src/secret", "deny").with_comment("Credentials stay private"),
        RawRule::new("docs", "allow"),
        RawRule::new("**/*.env*", "deny").with_comment("Environment files anywhere"),
    ]
}
