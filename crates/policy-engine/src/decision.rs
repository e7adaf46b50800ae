use std::fmt;

use serde::{Deserialize, Serialize};

use pathwarden_core::paths::PathStatus;

/// Outcome of resolving one candidate path against a rule set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Allow,
    Deny,
    /// No rule covers the path.
    NoMatch,
}

/// The rule that decided a resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchedRule {
    pub pattern: String,
    pub index: usize,
    pub is_glob: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyDecision {
    pub resolution: Resolution,
    pub reason: String,
    pub matched_rule: Option<MatchedRule>,
    /// How many rules covered the path before the winner was picked.
    pub candidates: usize,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Allow => "allow",
            Resolution::Deny => "deny",
            Resolution::NoMatch => "no_match",
        }
    }

    pub fn status(&self) -> Option<PathStatus> {
        match self {
            Resolution::Allow => Some(PathStatus::Allow),
            Resolution::Deny => Some(PathStatus::Deny),
            Resolution::NoMatch => None,
        }
    }
}

impl From<PathStatus> for Resolution {
    fn from(status: PathStatus) -> Self {
        match status {
            PathStatus::Allow => Resolution::Allow,
            PathStatus::Deny => Resolution::Deny,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PolicyDecision {
    pub fn no_match() -> Self {
        Self {
            resolution: Resolution::NoMatch,
            reason: "No rule covers this path".to_string(),
            matched_rule: None,
            candidates: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_both_ways() {
        assert_eq!(Resolution::from(PathStatus::Allow), Resolution::Allow);
        assert_eq!(Resolution::from(PathStatus::Deny), Resolution::Deny);
        assert_eq!(Resolution::Deny.status(), Some(PathStatus::Deny));
        assert_eq!(Resolution::NoMatch.status(), None);
    }

    #[test]
    fn no_match_decision_has_no_rule() {
        let decision = PolicyDecision::no_match();
        assert_eq!(decision.resolution, Resolution::NoMatch);
        assert!(decision.matched_rule.is_none());
        assert_eq!(decision.candidates, 0);
    }

    #[test]
    fn serializes_snake_case() {
        let text = serde_json::to_string(&Resolution::NoMatch).unwrap();
        assert_eq!(text, "\"no_match\"");
    }
}
