use thiserror::Error;

use surety_common::SuretyError;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] SuretyError),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid script: {0}")]
    Script(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
