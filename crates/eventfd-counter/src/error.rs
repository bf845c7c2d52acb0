//! Error types for eventfd counter operations.
//!
//! Every operation reports failures synchronously as a [`CounterError`].
//! Nothing is retried on the caller's behalf except a kernel call
//! interrupted by a signal.

use std::io;
use thiserror::Error;

/// Result type alias for counter operations.
pub type Result<T> = std::result::Result<T, CounterError>;

/// Errors that can occur while creating or driving a counter handle.
#[derive(Debug, Error)]
pub enum CounterError {
    /// The kernel refused to create the counter.
    #[error("Failed to create counter with initial value {initial_value}: {source}")]
    Creation {
        /// Initial value requested by the caller.
        initial_value: u64,
        /// The underlying kernel error.
        #[source]
        source: io::Error,
    },

    /// Zero or reserved increment amount, or an unrecognized flag bit.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation attempted on a handle that has been closed.
    #[error("Operation on closed counter handle")]
    ClosedHandle,

    /// `close()` called on a handle that is already closed.
    #[error("Counter handle already closed")]
    AlreadyClosed,

    /// Non-blocking handle would otherwise have suspended the caller.
    #[error("Operation would block")]
    WouldBlock,

    /// A kernel call failed unexpectedly or transferred a malformed byte count.
    #[error("{operation} failed: {source}")]
    System {
        /// The kernel call that failed (e.g., "read", "write", "close").
        operation: &'static str,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Configuration validation or parse error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error outside of the counter descriptor (configuration files).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CounterError {
    /// Creates a system error for the given kernel call.
    pub fn system(operation: &'static str, source: impl Into<io::Error>) -> Self {
        CounterError::System {
            operation,
            source: source.into(),
        }
    }

    /// Returns true if the operation failed only because it would block.
    pub fn is_would_block(&self) -> bool {
        matches!(self, CounterError::WouldBlock)
    }

    /// Returns true if the error stems from using a closed handle.
    pub fn is_closed(&self) -> bool {
        matches!(self, CounterError::ClosedHandle | CounterError::AlreadyClosed)
    }
}
