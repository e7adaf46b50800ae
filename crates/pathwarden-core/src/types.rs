use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of `llm_approvements.json` as written by the user.
///
/// Fields stay optional so a badly typed entry can be reported and skipped
/// instead of failing the whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawRule {
    #[serde(rename = "Path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RawRule {
    pub fn new(path: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            status: Some(status.into()),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Lenient conversion from a decoded JSON entry. Non-string fields and
    /// non-object entries come back as `None`; unknown fields are ignored.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            path: field("Path"),
            status: field("Status"),
            comment: field("Comment"),
        }
    }
}
