use std::path::PathBuf;

use anyhow::Result;

use super::load_tool_config;

pub fn print_effective(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_tool_config(config_path)?;
    let output = config.to_toml_string()?;
    println!("{}", output);
    Ok(())
}
