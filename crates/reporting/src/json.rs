use crate::CheckReport;

pub fn render_json(report: &CheckReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_report;

    #[test]
    fn renders_entries_and_stats() {
        let rendered = render_json(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["stats"]["total"], 3);
        assert_eq!(value["entries"][1]["decision"]["resolution"], "deny");
        assert_eq!(value["entries"][2]["decision"]["resolution"], "no_match");
        assert_eq!(value["rule_count"], 2);
    }
}
