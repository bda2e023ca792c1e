use std::path::PathBuf;
use crate::algorithms::{Phase, RouteMismatch};

/// Fatal problems with the scenario text.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("line {line}: expected `NODE1 NODE2 WEIGHT`, got {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("line {line}: weight {weight:?} is not an integer")]
    InvalidWeight { line: usize, weight: String },

    #[error("line {line}: negative weight {weight} is not allowed here")]
    NegativeWeight { line: usize, weight: i64 },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{phase} phase did not converge within {limit} rounds")]
    RoundLimitExceeded { phase: Phase, limit: u64 },
}

/// Converged routes that disagree with the shortest paths of the topology.
#[derive(Debug, thiserror::Error)]
#[error("{} routes disagree with the shortest paths", mismatches.len())]
pub struct VerifyError {
    pub mismatches: Vec<RouteMismatch>,
}

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}
