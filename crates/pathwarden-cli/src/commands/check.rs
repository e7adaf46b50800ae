use std::path::PathBuf;

use anyhow::Result;

use reporting::human::render_human;
use reporting::json::render_json;
use reporting::{CheckEntry, CheckReport};

use super::{
    current_dir, load_engine, load_tool_config, relative_to_root, rule_source_error, rules_file,
    rules_root,
};

#[derive(Debug)]
pub struct CheckInputs {
    pub config_path: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    pub json: bool,
    pub paths: Vec<String>,
}

pub fn execute(inputs: CheckInputs) -> Result<()> {
    let config = load_tool_config(inputs.config_path)?;
    let rules_path = rules_file(inputs.rules, &config, &current_dir()?)?;
    let (engine, summary) = load_engine(&rules_path)?;
    if let Some(error) = &summary.fatal_error {
        return Err(rule_source_error(&rules_path, error));
    }

    let root = rules_root(&rules_path);
    let rules = engine.snapshot();
    let entries = inputs
        .paths
        .iter()
        .map(|path| {
            let candidate = relative_to_root(path, &root);
            CheckEntry {
                decision: policy_engine::explain(&candidate, &rules),
                path: candidate,
            }
        })
        .collect();

    let report = CheckReport::new(Some(rules_path), summary.rule_count, summary.warnings, entries);
    if inputs.json {
        println!("{}", render_json(&report));
    } else {
        println!("{}", render_human(&report, &config.display));
    }
    Ok(())
}
