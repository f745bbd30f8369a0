//! Error types for cloak-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported encryption type: {0}")]
    UnsupportedType(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
