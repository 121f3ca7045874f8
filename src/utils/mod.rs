//! # Utility Modules
//!
//! Supporting utilities shared by the receive loop and channel handle.
//!
//! ## Components
//! - **Metrics**: Thread-safe per-channel counters

pub mod metrics;

pub use metrics::{ChannelMetrics, MetricsSnapshot};
