use goose::GooseError;
use thiserror::Error;

/// Errors raised while assembling or running a load test.
///
/// Failed HTTP requests are not errors here; goose records them in the
/// request metrics and they surface in the [`crate::report::RunSummary`].
#[derive(Debug, Error)]
pub enum LoadTestError {
    #[error("no user profiles selected")]
    NoProfiles,

    #[error("spawn rate must be a positive number, got {0}")]
    InvalidSpawnRate(f64),

    #[error("invalid value for header `{0}`")]
    InvalidHeader(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("load test engine: {0}")]
    Goose(#[from] GooseError),
}
