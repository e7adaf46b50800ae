use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use pathwarden_core::config::DisplayConfig;
use policy_engine::{PolicyDecision, Resolution};

pub mod human;
pub mod json;
pub mod redact;

/// Badge and tooltip shown next to a file. Paths no rule covers get none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decoration {
    pub badge: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckEntry {
    pub path: String,
    pub decision: PolicyDecision,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportStats {
    pub total: u32,
    pub allowed: u32,
    pub denied: u32,
    pub unmatched: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub generated_at: OffsetDateTime,
    pub rules_file: Option<PathBuf>,
    pub rule_count: usize,
    pub warnings: Vec<String>,
    pub entries: Vec<CheckEntry>,
    pub stats: ReportStats,
}

pub fn decoration_for(resolution: Resolution, display: &DisplayConfig) -> Option<Decoration> {
    match resolution {
        Resolution::Allow => Some(Decoration {
            badge: display.allow_badge.clone(),
            tooltip: display.allow_tooltip.clone(),
        }),
        Resolution::Deny => Some(Decoration {
            badge: display.deny_badge.clone(),
            tooltip: display.deny_tooltip.clone(),
        }),
        Resolution::NoMatch => None,
    }
}

impl CheckReport {
    pub fn new(
        rules_file: Option<PathBuf>,
        rule_count: usize,
        warnings: Vec<String>,
        entries: Vec<CheckEntry>,
    ) -> Self {
        let stats = ReportStats::from_entries(&entries);
        Self {
            generated_at: OffsetDateTime::now_utc(),
            rules_file,
            rule_count,
            warnings,
            entries,
            stats,
        }
    }
}

impl ReportStats {
    pub fn from_entries(entries: &[CheckEntry]) -> Self {
        let mut stats = ReportStats::default();

        for entry in entries {
            stats.total = stats.total.saturating_add(1);
            match entry.decision.resolution {
                Resolution::Allow => stats.allowed = stats.allowed.saturating_add(1),
                Resolution::Deny => stats.denied = stats.denied.saturating_add(1),
                Resolution::NoMatch => stats.unmatched = stats.unmatched.saturating_add(1),
            }
        }

        stats
    }
}
