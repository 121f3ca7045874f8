//! # Error Types
//!
//! Error handling for the replication packet channel.
//!
//! Every failure that can happen while receiving is captured by the receive loop
//! and delivered through the packet queue in stream order. The channel façade is
//! the only place that hands a failure back to the consumer, wrapped in
//! [`ChannelError::Receive`] so the originating channel is visible.
//!
//! ## Error Categories
//! - **Byte source**: I/O faults from the underlying stream
//! - **Framing**: the stream ended mid-frame or mid-reassembly, or a packet grew past the limit
//! - **Interpreter**: the injected packet interpreter rejected a body
//! - **Cancellation**: a read was cancelled before a packet arrived
//!
//! ## Example Usage
//! ```rust
//! use repl_wire::error::{ChannelError, Result};
//!
//! fn check_capacity(capacity: usize) -> Result<usize> {
//!     if capacity == 0 {
//!         return Err(ChannelError::ConfigError("capacity must be positive".into()));
//!     }
//!     Ok(capacity)
//! }
//!
//! assert!(check_capacity(0).is_err());
//! ```

use std::io;
use thiserror::Error;

/// Boxed error produced by a packet interpreter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    pub const ERR_INTERPRETER_PANICKED: &str = "Packet interpreter panicked";
}

// ChannelError is the primary error type for all channel operations
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Stream truncated: {buffered} bytes of an incomplete frame, {fragments} pending fragments")]
    TruncatedStream { buffered: usize, fragments: usize },

    #[error("Packet interpreter failed: {0}")]
    Interpreter(#[source] BoxError),

    #[error("Packet too large: {size} bytes (limit {limit})")]
    OversizedPacket { size: usize, limit: usize },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Channel '{channel}' failed: {source}")]
    Receive {
        channel: String,
        #[source]
        source: Box<ChannelError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ChannelError {
    /// Whether this error reports a cancelled operation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChannelError::Cancelled)
    }

    /// The failure underneath any `Receive` wrapping.
    pub fn root_cause(&self) -> &ChannelError {
        match self {
            ChannelError::Receive { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn wrap(channel: &str, cause: ChannelError) -> Self {
        ChannelError::Receive {
            channel: channel.to_string(),
            source: Box::new(cause),
        }
    }
}

/// Type alias for Results using ChannelError
pub type Result<T> = std::result::Result<T, ChannelError>;
