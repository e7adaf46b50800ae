use std::fmt::Write;

use pathwarden_core::config::DisplayConfig;

use crate::redact::redact_path;
use crate::{decoration_for, CheckReport};

const NO_DECORATION: &str = "  ";

pub fn render_human(report: &CheckReport, display: &DisplayConfig) -> String {
    let mut out = String::new();

    match &report.rules_file {
        Some(path) => {
            let _ = writeln!(out, "Rules: {} ({} active)", redact_path(path), report.rule_count);
        }
        None => {
            let _ = writeln!(out, "Rules: none found");
        }
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "Warning: {warning}");
    }

    for entry in &report.entries {
        let decision = &entry.decision;
        match decoration_for(decision.resolution, display) {
            Some(decoration) => {
                let _ = writeln!(
                    out,
                    "{} {}  {} ({})",
                    decoration.badge, entry.path, decoration.tooltip, decision.reason
                );
            }
            None => {
                let _ = writeln!(out, "{NO_DECORATION} {}  {}", entry.path, decision.reason);
            }
        }
    }

    let stats = &report.stats;
    let _ = write!(
        out,
        "{} paths: {} allowed, {} denied, {} without a rule.",
        stats.total, stats.allowed, stats.denied, stats.unmatched
    );
    out
}
