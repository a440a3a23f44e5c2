//! Error types for viewing-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewingError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid appointment record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, ViewingError>;
