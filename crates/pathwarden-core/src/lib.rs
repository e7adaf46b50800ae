pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use config::{Config, ConfigPaths, DisplayConfig, RulesConfig, WatchConfig};
pub use error::PathWardenError;
pub use paths::{is_glob_pattern, normalize_path, PathStatus};
pub use types::RawRule;
