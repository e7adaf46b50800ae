use std::fmt;

use serde::{Deserialize, Serialize};

/// Characters that turn a rule pattern into a glob.
const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    Allow,
    Deny,
}

impl PathStatus {
    /// Parses a rule status, ignoring ASCII case (`Allow`, `DENY`, ...).
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("allow") {
            Some(PathStatus::Allow)
        } else if value.eq_ignore_ascii_case("deny") {
            Some(PathStatus::Deny)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PathStatus::Allow => "allow",
            PathStatus::Deny => "deny",
        }
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalizes a rule pattern or candidate path.
///
/// Backslashes become forward slashes, leading `./` and `/` prefixes are
/// stripped, and trailing slashes are removed. Nothing else is touched: case,
/// `..` segments and doubled inner slashes survive as written.
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let mut trimmed = replaced.as_str();

    loop {
        if let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            trimmed = rest;
        } else {
            break;
        }
    }

    trimmed.trim_end_matches('/').to_string()
}

/// Lexical glob check; callers cache the answer alongside the pattern.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(&GLOB_META[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_backslashes() {
        assert_eq!(
            normalize_path("src\\components\\header.ts"),
            "src/components/header.ts"
        );
    }

    #[test]
    fn strips_leading_markers() {
        assert_eq!(normalize_path("./src/file.ts"), "src/file.ts");
        assert_eq!(normalize_path("/src/file.ts"), "src/file.ts");
        assert_eq!(normalize_path(".\\src\\file.ts"), "src/file.ts");
    }

    #[test]
    fn strips_trailing_slash() {
        assert_eq!(normalize_path("src/folder/"), "src/folder");
    }

    #[test]
    fn handles_mixed_separators() {
        assert_eq!(
            normalize_path("src\\folder/subfolder\\file.ts"),
            "src/folder/subfolder/file.ts"
        );
    }

    #[test]
    fn empty_and_root_inputs_collapse() {
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("./"), "");
        assert_eq!(normalize_path("."), ".");
    }

    #[test]
    fn leaves_inner_structure_alone() {
        assert_eq!(normalize_path("a//b/../C"), "a//b/../C");
        assert_eq!(normalize_path("src/./x"), "src/./x");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "",
            "/",
            "//a",
            "././a",
            ".//a//",
            "a\\b\\",
            "\\\\server\\share",
            "./**/*.ts",
            "src/secret/",
            "...",
            "./.env",
        ];
        for input in inputs {
            let once = normalize_path(input);
            assert_eq!(normalize_path(&once), once, "input {input:?}");
            assert!(!once.starts_with('/'), "input {input:?}");
            assert!(!once.starts_with("./"), "input {input:?}");
            assert!(!once.ends_with('/'), "input {input:?}");
            assert!(!once.contains('\\'), "input {input:?}");
        }
    }

    #[test]
    fn classifies_globs() {
        assert!(is_glob_pattern("**/*.ts"));
        assert!(is_glob_pattern("*.env*"));
        assert!(is_glob_pattern("src/file?.rs"));
        assert!(is_glob_pattern("src/[ab].rs"));
        assert!(is_glob_pattern("src/{a,b}.rs"));
        assert!(!is_glob_pattern("src"));
        assert!(!is_glob_pattern("readme.md"));
        assert!(!is_glob_pattern(""));
    }

    #[test]
    fn status_parse_ignores_case() {
        assert_eq!(PathStatus::parse("allow"), Some(PathStatus::Allow));
        assert_eq!(PathStatus::parse("Allow"), Some(PathStatus::Allow));
        assert_eq!(PathStatus::parse("DENY"), Some(PathStatus::Deny));
        assert_eq!(PathStatus::parse("maybe"), None);
        assert_eq!(PathStatus::parse(" allow"), None);
    }
}
