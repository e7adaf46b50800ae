use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use policy_engine::{LoadSummary, PolicyEngine};

pub mod fs_watch;
pub mod project;

pub use fs_watch::{RuleFileChange, RulesWatcher};
pub use project::{is_excluded, locate_rules_file, project_files};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Loaded(LoadSummary),
    /// The rule file is gone; the engine now has no rules.
    Cleared,
}

/// Re-reads `rules_file` into `engine`. A missing file clears the rules.
pub fn reload(engine: &PolicyEngine, rules_file: &Path) -> Result<ReloadOutcome> {
    if !rules_file.exists() {
        engine.clear();
        info!(path = %rules_file.display(), "rule file removed");
        return Ok(ReloadOutcome::Cleared);
    }
    let contents = fs::read_to_string(rules_file)
        .with_context(|| format!("read rule file {}", rules_file.display()))?;
    Ok(ReloadOutcome::Loaded(engine.load_str(&contents)))
}
