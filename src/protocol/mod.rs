//! # Packet Interpretation
//!
//! The capability that turns an assembled body into an application packet.
//! The channel never looks inside packets; it only carries what the
//! interpreter returns.

pub mod interpreter;

pub use interpreter::{PacketInterpreter, RawInterpreter};
