use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use monitor::{reload, ReloadOutcome, RulesWatcher};
use pathwarden_core::config::DisplayConfig;
use policy_engine::PolicyEngine;
use reporting::decoration_for;

use super::{current_dir, load_tool_config, relative_to_root, rules_file, rules_root};

const WAIT: Duration = Duration::from_secs(60);

pub fn execute(config_path: Option<PathBuf>, rules: Option<PathBuf>, paths: Vec<String>) -> Result<()> {
    let config = load_tool_config(config_path)?;
    let rules_path = rules_file(rules, &config, &current_dir()?)?;
    let root = rules_root(&rules_path);
    let candidates: Vec<String> = paths.iter().map(|path| relative_to_root(path, &root)).collect();

    let engine = PolicyEngine::default();
    let mut watcher = RulesWatcher::new(&rules_path, Duration::from_millis(config.watch.debounce_ms))?;
    println!("Watching {} (Ctrl-C to stop)", rules_path.display());

    report(&engine, reload(&engine, &rules_path)?, &candidates, &config.display);
    loop {
        if watcher.next_change(WAIT).is_none() {
            continue;
        }
        match reload(&engine, watcher.rules_file()) {
            Ok(outcome) => report(&engine, outcome, &candidates, &config.display),
            Err(error) => eprintln!("Failed to reload rules: {error:#}"),
        }
    }
}

fn report(engine: &PolicyEngine, outcome: ReloadOutcome, candidates: &[String], display: &DisplayConfig) {
    match outcome {
        ReloadOutcome::Cleared => println!("Rule file removed; no rules active."),
        ReloadOutcome::Loaded(summary) => {
            if let Some(headline) = summary.headline() {
                println!("{headline}");
            }
            println!("{} rules active.", summary.rule_count);
        }
    }

    for candidate in candidates {
        let resolution = engine.resolve(candidate);
        match decoration_for(resolution, display) {
            Some(decoration) => println!("  {} {}  {}", decoration.badge, candidate, decoration.tooltip),
            None => println!("     {}", candidate),
        }
    }
}
