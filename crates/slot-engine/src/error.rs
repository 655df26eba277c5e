//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid slot length: {0} minutes")]
    InvalidSlotLength(u32),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Invalid availability config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
