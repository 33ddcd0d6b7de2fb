//! Error types for the duel engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid market slot: {0}")]
    InvalidSlot(usize),

    #[error("Insufficient funds: cost {cost}, available {available}")]
    InsufficientFunds { cost: u32, available: u32 },

    #[error("Strategy failure: {0}")]
    StrategyFailure(String),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Invalid rules configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DuelError>;
