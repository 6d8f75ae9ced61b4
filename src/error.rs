//! Error handling

use thiserror::Error;

pub type FeedResult<T> = Result<T, FeedError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Generator start requested while a tick timer is already armed
    #[error("alert generator is already running")]
    AlreadyRunning,

    /// Rejected at construction, never at runtime
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Timers need a Tokio runtime on the calling thread
    #[error("no tokio runtime available to schedule timers")]
    NoRuntime,

    #[error("invalid severity filter '{0}' (expected all, high, medium or low)")]
    InvalidFilter(String),
}

impl FeedError {
    pub fn config(msg: impl Into<String>) -> Self {
        FeedError::InvalidConfig(msg.into())
    }
}
