use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathWardenError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("rule source error: {0}")]
    RuleSource(String),
}
