//! # Core Framing Components
//!
//! Frame scanning, fragment reassembly and the tokio codec built from them.
//!
//! ## Components
//! - **Frame**: Header layout and frame encoding
//! - **Scanner**: Finds one complete frame at the front of a buffer
//! - **Reassembler**: Joins maximum-length fragments into one logical packet
//! - **Codec**: Tokio codec for framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [Length(3, LE)] [Sequence(1)] [Body(Length)]
//! ```
//!
//! A body of exactly 16,777,215 bytes means the packet continues in the next
//! frame. The last frame of a packet is always shorter, possibly empty.

pub mod codec;
pub mod frame;
pub mod reassembler;
pub mod scanner;
