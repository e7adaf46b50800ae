//! Rule ingestion.
//!
//! Turns raw `llm_approvements.json` entries into an immutable, indexed
//! [`RuleSet`]. Invalid entries are skipped with a warning and never consume
//! an index; duplicate literal paths are kept but reported.

use std::collections::HashMap;
use std::slice;

use serde::Serialize;
use serde_json::Value;

use pathwarden_core::paths::{is_glob_pattern, normalize_path, PathStatus};
use pathwarden_core::types::RawRule;

use crate::rules::glob::GlobMatcher;

/// A validated rule. Only obtainable through [`RuleSet::build`], which
/// normalizes the pattern and compiles it when it is a glob.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Rule {
    pattern: String,
    status: PathStatus,
    is_glob: bool,
    /// Position among the surviving rules, in declaration order.
    index: usize,
    #[serde(skip)]
    matcher: Option<GlobMatcher>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub rules: RuleSet,
    pub warnings: Vec<String>,
    pub fatal_error: Option<String>,
}

impl Rule {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn status(&self) -> PathStatus {
        self.status
    }

    pub fn is_glob(&self) -> bool {
        self.is_glob
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The compiled pattern of a glob rule; `None` for literal rules.
    pub fn matcher(&self) -> Option<&GlobMatcher> {
        self.matcher.as_ref()
    }

    /// Specificity used to rank covering rules: pattern length in characters.
    pub fn specificity(&self) -> usize {
        self.pattern.chars().count()
    }
}

impl RuleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(entries: &[RawRule]) -> ParseOutcome {
        let mut rules = Vec::with_capacity(entries.len());
        let mut warnings = Vec::new();
        // Last rule index seen per literal pattern. Globs are allowed to repeat.
        let mut literal_seen: HashMap<String, usize> = HashMap::new();

        for (position, entry) in entries.iter().enumerate() {
            let (Some(path), Some(status)) = (entry.path.as_deref(), entry.status.as_deref())
            else {
                warnings.push(format!(
                    "Item at index {position} is missing Path/Status. Skipped."
                ));
                continue;
            };

            let Some(status) = PathStatus::parse(status) else {
                warnings.push(format!(
                    "Item at index {position} has invalid Status '{status}'. Must be 'allow' or 'deny'. Skipped."
                ));
                continue;
            };

            let pattern = normalize_path(path);
            let is_glob = is_glob_pattern(&pattern);
            let index = rules.len();

            if !is_glob {
                if let Some(previous) = literal_seen.insert(pattern.clone(), index) {
                    warnings.push(format!(
                        "Duplicate path detected: {pattern}. Rule at index {index} overrides rule at index {previous}."
                    ));
                }
            }

            let matcher = is_glob.then(|| GlobMatcher::new(&pattern));
            rules.push(Rule {
                pattern,
                status,
                is_glob,
                index,
                matcher,
            });
        }

        ParseOutcome {
            rules: RuleSet { rules },
            warnings,
            fatal_error: None,
        }
    }

    pub fn iter(&self) -> slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl ParseOutcome {
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            rules: RuleSet::empty(),
            warnings: Vec::new(),
            fatal_error: Some(message.into()),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal_error.is_some()
    }
}

/// Decodes the contents of a rule file and builds its rule set.
///
/// Blank input is an empty policy, not an error. Anything that is not a JSON
/// array of entries is fatal and yields no rules at all.
pub fn parse_rules(contents: &str) -> ParseOutcome {
    if contents.trim().is_empty() {
        return ParseOutcome::default();
    }

    let root: Value = match serde_json::from_str(contents) {
        Ok(value) => value,
        Err(_) => return ParseOutcome::fatal("Invalid JSON syntax."),
    };

    let Value::Array(items) = root else {
        return ParseOutcome::fatal("Root element must be an array of rules.");
    };

    let entries: Vec<RawRule> = items.iter().map(RawRule::from_json).collect();
    RuleSet::build(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_rules_in_order() {
        let outcome = parse_rules(
            r#"[
                { "Path": "src", "Status": "allow" },
                { "Path": "test", "Status": "deny" }
            ]"#,
        );

        assert!(outcome.fatal_error.is_none());
        assert_eq!(outcome.rules.len(), 2);
        let first = outcome.rules.get(0).unwrap();
        assert_eq!(first.pattern(), "src");
        assert_eq!(first.index(), 0);
        let second = outcome.rules.get(1).unwrap();
        assert_eq!(second.status(), PathStatus::Deny);
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn broken_json_is_fatal() {
        let outcome = parse_rules(r#"[ { "Path": "src", "Status" ... BROKEN ..."#);
        assert_eq!(outcome.fatal_error.as_deref(), Some("Invalid JSON syntax."));
        assert!(outcome.rules.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn non_array_root_is_fatal() {
        let outcome = parse_rules(r#"{ "Path": "src", "Status": "allow" }"#);
        assert!(outcome.is_fatal());
        assert!(outcome.rules.is_empty());
    }

    #[test]
    fn blank_input_is_an_empty_policy() {
        let outcome = parse_rules("  \n ");
        assert!(!outcome.is_fatal());
        assert!(outcome.rules.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn normalizes_paths() {
        let outcome = parse_rules(r#"[{ "Path": "./src\\windows", "Status": "allow" }]"#);
        assert_eq!(outcome.rules.get(0).unwrap().pattern(), "src/windows");

        let outcome = parse_rules(r#"[{ "Path": "./**/*.ts", "Status": "allow" }]"#);
        let rule = outcome.rules.get(0).unwrap();
        assert_eq!(rule.pattern(), "**/*.ts");
        assert!(rule.is_glob());
        assert!(rule.matcher().is_some_and(|m| m.is_match("web/app.ts")));
    }

    #[test]
    fn status_is_case_insensitive() {
        let outcome = RuleSet::build(&[
            RawRule::new("a", "Allow"),
            RawRule::new("b", "DENY"),
        ]);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.rules.get(0).unwrap().status(), PathStatus::Allow);
        assert_eq!(outcome.rules.get(1).unwrap().status(), PathStatus::Deny);
    }

    #[test]
    fn invalid_entries_are_skipped_without_consuming_an_index() {
        let outcome = parse_rules(
            r#"[
                { "Path": "a", "Status": "allow" },
                { "Path": "b" },
                { "Path": 7, "Status": "deny" },
                { "Path": "c", "Status": "maybe" },
                "d",
                { "Path": "e", "Status": "deny", "Comment": "kept" }
            ]"#,
        );

        assert!(!outcome.is_fatal());
        assert_eq!(outcome.rules.len(), 2);
        let indices: Vec<usize> = outcome.rules.iter().map(Rule::index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(outcome.rules.get(1).unwrap().pattern(), "e");

        assert_eq!(outcome.warnings.len(), 4);
        assert!(outcome.warnings[0].contains("missing Path/Status"));
        assert!(outcome.warnings[0].contains("index 1"));
        assert!(outcome.warnings[1].contains("missing Path/Status"));
        assert!(outcome.warnings[2].contains("invalid Status 'maybe'"));
        assert!(outcome.warnings[3].contains("index 4"));
    }

    #[test]
    fn duplicate_literal_paths_warn_but_both_survive() {
        let outcome = parse_rules(
            r#"[
                { "Path": "src", "Status": "allow" },
                { "Path": "src", "Status": "deny" }
            ]"#,
        );
        assert_eq!(outcome.rules.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("Duplicate path detected"));
        assert!(outcome.warnings[0].contains("Rule at index 1 overrides rule at index 0"));
    }

    #[test]
    fn duplicates_are_detected_after_normalization() {
        let outcome = RuleSet::build(&[
            RawRule::new("./docs/", "allow"),
            RawRule::new("docs", "deny"),
            RawRule::new("\\docs", "allow"),
        ]);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.warnings[1].contains("Rule at index 2 overrides rule at index 1"));
    }

    #[test]
    fn duplicate_globs_are_silent() {
        let outcome = parse_rules(
            r#"[
                { "Path": "**/*.ts", "Status": "allow" },
                { "Path": "**/*.ts", "Status": "deny" }
            ]"#,
        );
        assert_eq!(outcome.rules.len(), 2);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn classifies_globs_at_ingestion() {
        let outcome = parse_rules(
            r#"[
                { "Path": "**/*.ts", "Status": "allow" },
                { "Path": "*.env*", "Status": "deny" },
                { "Path": "src/*.js", "Status": "allow" },
                { "Path": "src", "Status": "allow" },
                { "Path": "readme.md", "Status": "deny" }
            ]"#,
        );
        let flags: Vec<bool> = outcome.rules.iter().map(Rule::is_glob).collect();
        assert_eq!(flags, vec![true, true, true, false, false]);
        let compiled: Vec<bool> = outcome.rules.iter().map(|r| r.matcher().is_some()).collect();
        assert_eq!(compiled, flags);
    }
}
