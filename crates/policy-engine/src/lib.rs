use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

mod decision;
pub mod rules;
pub mod ruleset;

pub use decision::{MatchedRule, PolicyDecision, Resolution};
pub use rules::filesystem::{explain, resolve};
pub use ruleset::{parse_rules, ParseOutcome, Rule, RuleSet};

/// Holds the active rule set and answers queries against it.
///
/// Reloads swap in a whole new [`RuleSet`]; queries clone the current `Arc`
/// and resolve without holding the lock, so a query running during a reload
/// finishes against the policy it started with.
#[derive(Debug, Default)]
pub struct PolicyEngine {
    current: RwLock<Arc<RuleSet>>,
}

/// What a load did to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rules now active. Zero after a fatal load.
    pub rule_count: usize,
    pub warnings: Vec<String>,
    pub fatal_error: Option<String>,
}

impl PolicyEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(rules)),
        }
    }

    /// The rule set future queries will see.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Installs `rules` and returns the set it replaced.
    pub fn replace(&self, rules: RuleSet) -> Arc<RuleSet> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(rules))
    }

    pub fn clear(&self) {
        self.replace(RuleSet::empty());
        info!("rules cleared");
    }

    /// Parses rule file contents and installs the result.
    ///
    /// A fatal parse installs an empty set, so every query answers
    /// [`Resolution::NoMatch`] until a valid file is loaded.
    pub fn load_str(&self, contents: &str) -> LoadSummary {
        let ParseOutcome {
            rules,
            warnings,
            fatal_error,
        } = parse_rules(contents);

        for warning in &warnings {
            warn!(%warning, "rule warning");
        }

        if let Some(error) = fatal_error {
            self.replace(RuleSet::empty());
            warn!(%error, "rule file rejected, no rules active");
            return LoadSummary {
                rule_count: 0,
                warnings,
                fatal_error: Some(error),
            };
        }

        let rule_count = rules.len();
        self.replace(rules);
        info!(rule_count, warnings = warnings.len(), "rules loaded");
        LoadSummary {
            rule_count,
            warnings,
            fatal_error: None,
        }
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        resolve(path, &self.snapshot())
    }

    pub fn explain(&self, path: &str) -> PolicyDecision {
        explain(path, &self.snapshot())
    }
}

impl LoadSummary {
    /// The message a user should see first, if any: the fatal error, else the
    /// first warning.
    pub fn headline(&self) -> Option<String> {
        match (&self.fatal_error, self.warnings.first()) {
            (Some(error), _) => Some(format!("Config Error: {error}")),
            (None, Some(warning)) => Some(format!("Config Warning: {warning}")),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    const RULES: &str = r#"[
        { "Path": "src", "Status": "allow" },
        { "Path": "src/secret", "Status": "deny" }
    ]"#;

    #[test]
    fn starts_empty() {
        let engine = PolicyEngine::default();
        assert!(engine.snapshot().is_empty());
        assert_eq!(engine.resolve("src/main.rs"), Resolution::NoMatch);
    }

    #[test]
    fn load_installs_rules() {
        let engine = PolicyEngine::default();
        let summary = engine.load_str(RULES);
        assert_eq!(summary.rule_count, 2);
        assert!(summary.headline().is_none());
        assert_eq!(engine.resolve("src/secret/key.pem"), Resolution::Deny);
        assert_eq!(engine.resolve("src/lib.rs"), Resolution::Allow);
    }

    #[test]
    fn fatal_load_drops_all_rules() {
        let engine = PolicyEngine::default();
        engine.load_str(RULES);
        assert_eq!(engine.resolve("src/lib.rs"), Resolution::Allow);

        let summary = engine.load_str("{ not json");
        assert_eq!(summary.fatal_error.as_deref(), Some("Invalid JSON syntax."));
        assert_eq!(summary.rule_count, 0);
        assert_eq!(
            summary.headline().as_deref(),
            Some("Config Error: Invalid JSON syntax.")
        );
        assert!(engine.snapshot().is_empty());
        assert_eq!(engine.resolve("src/lib.rs"), Resolution::NoMatch);
        assert_eq!(engine.resolve("src/secret/key.pem"), Resolution::NoMatch);

        engine.load_str("[1, 2]");
        let summary = engine.load_str(r#"{ "Path": "src", "Status": "allow" }"#);
        assert_eq!(summary.rule_count, 0);
        assert_eq!(engine.resolve("src/lib.rs"), Resolution::NoMatch);
    }

    #[test]
    fn headline_prefers_first_warning() {
        let engine = PolicyEngine::default();
        let summary = engine.load_str(
            r#"[
                { "Path": "src", "Status": "allow" },
                { "Path": "src", "Status": "deny" },
                { "Path": "docs", "Status": "perhaps" }
            ]"#,
        );
        assert_eq!(summary.warnings.len(), 2);
        let headline = summary.headline().unwrap();
        assert!(headline.starts_with("Config Warning: Duplicate path detected"));
    }

    #[test]
    fn clear_removes_rules() {
        let engine = PolicyEngine::default();
        engine.load_str(RULES);
        engine.clear();
        assert_eq!(engine.resolve("src/lib.rs"), Resolution::NoMatch);
    }

    #[test]
    fn held_snapshot_survives_replace() {
        let engine = PolicyEngine::default();
        engine.load_str(RULES);
        let before = engine.snapshot();

        let previous = engine.replace(RuleSet::empty());
        assert_eq!(previous.len(), 2);
        assert_eq!(resolve("src/lib.rs", &before), Resolution::Allow);
        assert_eq!(engine.resolve("src/lib.rs"), Resolution::NoMatch);
    }

    #[test]
    fn concurrent_readers_share_one_engine() {
        let engine = Arc::new(PolicyEngine::default());
        engine.load_str(RULES);

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    (0..200)
                        .map(|_| engine.resolve("src/secret/token"))
                        .all(|resolution| resolution == Resolution::Deny)
                })
            })
            .collect();

        for reader in readers {
            assert!(reader.join().unwrap());
        }
    }
}
