//! Path resolution against a [`RuleSet`].
//!
//! A literal rule covers its own path, everything below it, and (when its
//! pattern is empty) every path. A glob rule covers whatever the glob matches.
//! Among covering rules the longest pattern wins; equal lengths go to the
//! rule declared last.

use std::cmp::Ordering;

use tracing::debug;

use pathwarden_core::paths::normalize_path;

use crate::decision::{MatchedRule, PolicyDecision, Resolution};
use crate::ruleset::{Rule, RuleSet};

pub fn resolve(path: &str, rules: &RuleSet) -> Resolution {
    explain(path, rules).resolution
}

/// Like [`resolve`], but reports which rule decided and why.
pub fn explain(path: &str, rules: &RuleSet) -> PolicyDecision {
    let candidate = normalize_path(path);

    let mut candidates = 0;
    let mut winner: Option<&Rule> = None;
    for rule in rules.iter().filter(|rule| covers(rule, &candidate)) {
        candidates += 1;
        winner = match winner {
            Some(current) if outranks(current, rule) => Some(current),
            _ => Some(rule),
        };
    }

    let Some(rule) = winner else {
        debug!(path = %candidate, "no rule covers path");
        return PolicyDecision::no_match();
    };

    debug!(
        path = %candidate,
        pattern = %rule.pattern(),
        index = rule.index(),
        status = %rule.status(),
        candidates,
        "resolved path"
    );

    let kind = if rule.is_glob() { "glob" } else { "path" };
    PolicyDecision {
        resolution: Resolution::from(rule.status()),
        reason: format!(
            "{} by {kind} rule #{} '{}'",
            capitalize(rule.status().as_str()),
            rule.index(),
            rule.pattern()
        ),
        matched_rule: Some(MatchedRule {
            pattern: rule.pattern().to_string(),
            index: rule.index(),
            is_glob: rule.is_glob(),
        }),
        candidates,
    }
}

/// Whether `rule` applies to an already normalized candidate path.
pub fn covers(rule: &Rule, candidate: &str) -> bool {
    if let Some(matcher) = rule.matcher() {
        return matcher.is_match(candidate);
    }
    if rule.pattern().is_empty() {
        return true;
    }
    match candidate.strip_prefix(rule.pattern()) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Orders covering rules: longer pattern first, then later declaration.
fn rank(a: &Rule, b: &Rule) -> Ordering {
    a.specificity()
        .cmp(&b.specificity())
        .then_with(|| a.index().cmp(&b.index()))
}

fn outranks(a: &Rule, b: &Rule) -> bool {
    rank(a, b) == Ordering::Greater
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
