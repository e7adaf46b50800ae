use std::path::Path;

/// Replaces the user's home directory prefix with `~` for display.
pub fn redact_path(path: &Path) -> String {
    redact_with_home(path, std::env::var("HOME").ok().as_deref())
}

fn redact_with_home(path: &Path, home: Option<&str>) -> String {
    let display = path.display().to_string();
    let Some(home) = home.map(|home| home.trim_end_matches('/')) else {
        return display;
    };
    if home.is_empty() {
        return display;
    }
    match display.strip_prefix(home) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{rest}"),
        _ => display,
    }
}
