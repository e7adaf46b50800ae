use std::path::PathBuf;

use anyhow::Result;

use super::{current_dir, load_engine, load_tool_config, rule_source_error, rules_file};

pub fn execute(config_path: Option<PathBuf>, rules: Option<PathBuf>) -> Result<()> {
    let config = load_tool_config(config_path)?;
    let rules_path = rules_file(rules, &config, &current_dir()?)?;
    let (_, summary) = load_engine(&rules_path)?;

    if let Some(error) = summary.fatal_error {
        return Err(rule_source_error(&rules_path, &error));
    }

    for warning in &summary.warnings {
        println!("Warning: {warning}");
    }
    println!(
        "{}: {} rules, {} warnings",
        rules_path.display(),
        summary.rule_count,
        summary.warnings.len()
    );
    Ok(())
}
