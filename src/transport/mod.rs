//! # Transport
//!
//! The background receive loop and the consumer handle that reads from it.

pub mod channel;
mod receive;

pub use channel::PacketChannel;
