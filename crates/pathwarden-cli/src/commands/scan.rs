use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use reporting::human::render_human;
use reporting::json::render_json;
use reporting::{CheckEntry, CheckReport};

use super::{load_engine, load_tool_config, rule_source_error, rules_file, rules_root};

#[derive(Debug)]
pub struct ScanInputs {
    pub config_path: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    pub json: bool,
    pub root: PathBuf,
}

pub fn execute(inputs: ScanInputs) -> Result<()> {
    let config = load_tool_config(inputs.config_path)?;
    let rules_path = rules_file(inputs.rules, &config, &inputs.root)?;
    let (engine, summary) = load_engine(&rules_path)?;
    if let Some(error) = &summary.fatal_error {
        return Err(rule_source_error(&rules_path, error));
    }

    // Patterns are relative to the rule file's directory, so walk from there.
    let root = rules_root(&rules_path);
    let files = monitor::project_files(&root, &config.rules.exclude)?;
    debug!(root = %root.display(), files = files.len(), "scanning project");

    let rules = engine.snapshot();
    let entries = files
        .into_iter()
        .map(|path| CheckEntry {
            decision: policy_engine::explain(&path, &rules),
            path,
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
