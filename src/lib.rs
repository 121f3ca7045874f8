//! # repl-wire
//!
//! Length-prefixed frame decoding for database replication connections.
//!
//! A replication stream is a sequence of frames, each a 3-byte little-endian
//! length, a 1-byte sequence number and a body. Packets larger than one frame
//! are split into maximum-length frames followed by a shorter terminal frame.
//! This crate scans frames as bytes arrive, reassembles split packets and hands
//! them, in order, to a consumer through a bounded queue.
//!
//! ## Layers
//! - [`core`]: frame header, scanner, reassembler and tokio codec
//! - [`protocol`]: the pluggable [`PacketInterpreter`]
//! - [`transport`]: the receive loop and [`PacketChannel`]
//! - [`config`]: [`ChannelConfig`] loading and validation
//! - [`utils`]: per-channel metrics

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use config::ChannelConfig;
pub use self::core::codec::FrameCodec;
pub use self::core::frame::{FrameHeader, HEADER_LEN, MAX_FRAME_BODY_LEN};
pub use error::{ChannelError, Result};
pub use protocol::{PacketInterpreter, RawInterpreter};
pub use transport::PacketChannel;
