//! # Frame Header
//!
//! Wire layout of a single replication frame:
//!
//! ```text
//! [Length(3, little-endian)] [Sequence(1)] [Body(Length)]
//! ```
//!
//! A body of exactly [`MAX_FRAME_BODY_LEN`] bytes marks a non-terminal fragment;
//! the logical packet continues in the next frame.

use bytes::{BufMut, Bytes, BytesMut};

/// Size of the fixed frame header in bytes.
pub const HEADER_LEN: usize = 4;

/// Largest body a single frame can carry (2^24 - 1).
pub const MAX_FRAME_BODY_LEN: usize = 0xFF_FFFF;

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub body_len: usize,
    pub sequence: u8,
}

impl FrameHeader {
    /// Parse a header from the first [`HEADER_LEN`] bytes of `buf`.
    ///
    /// Returns `None` when fewer than four bytes are available.
    #[inline]
    pub fn parse(buf: &[u8]) -> Option<Self> {
        let raw = buf.get(..HEADER_LEN)?;
        Some(Self {
            body_len: usize::from(raw[0]) | usize::from(raw[1]) << 8 | usize::from(raw[2]) << 16,
            sequence: raw[3],
        })
    }

    /// Whether a frame with this header is followed by another fragment of the same packet.
    #[inline]
    pub fn is_continuation(&self) -> bool {
        self.body_len == MAX_FRAME_BODY_LEN
    }

    /// Write the header. Bodies longer than [`MAX_FRAME_BODY_LEN`] are a caller bug.
    pub fn write(&self, dst: &mut BytesMut) {
        debug_assert!(self.body_len <= MAX_FRAME_BODY_LEN);
        let len = self.body_len as u32;
        dst.put_slice(&len.to_le_bytes()[..3]);
        dst.put_u8(self.sequence);
    }
}

/// Append `body` to `dst` as one or more wire frames.
///
/// The body is cut into maximum-length frames followed by one shorter terminal
/// frame, which is empty when the length is an exact multiple of the maximum.
/// Returns the sequence number the next frame should carry.
pub fn encode_packet(body: &[u8], mut sequence: u8, dst: &mut BytesMut) -> u8 {
    let full = body.len() / MAX_FRAME_BODY_LEN;
    dst.reserve(body.len() + (full + 1) * HEADER_LEN);

    let mut chunks = body.chunks_exact(MAX_FRAME_BODY_LEN);
    for chunk in chunks.by_ref() {
        FrameHeader {
            body_len: chunk.len(),
            sequence,
        }
        .write(dst);
        dst.put_slice(chunk);
        sequence = sequence.wrapping_add(1);
    }

    let tail = chunks.remainder();
    FrameHeader {
        body_len: tail.len(),
        sequence,
    }
    .write(dst);
    dst.put_slice(tail);
    sequence.wrapping_add(1)
}

/// Convenience wrapper over [`encode_packet`] producing frozen bytes.
pub fn packet_to_frames(body: &[u8], sequence: u8) -> Bytes {
    let mut dst = BytesMut::new();
    encode_packet(body, sequence, &mut dst);
    dst.freeze()
}
