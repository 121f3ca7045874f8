//! # Frame Codec
//!
//! Tokio codec that turns a replication byte stream into logical packet bodies.
//!
//! The decoder scans frames off the front of the read buffer and feeds each body
//! to a [`Reassembler`]. It yields a body only when a logical packet is complete,
//! so one read can produce several packets and one packet can span many reads.
//! Bytes of an incomplete frame stay in the buffer untouched until more arrive.
//!
//! When a [`ChannelMetrics`] collector is attached, every byte that lands in the
//! read buffer and every frame split off it is counted as it happens, so the
//! counters stay accurate even when the stream later fails.
//!
//! The encoder is the inverse: it splits a logical body into wire frames with
//! incrementing sequence numbers.

use std::sync::Arc;

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use super::frame::{encode_packet, HEADER_LEN};
use super::reassembler::Reassembler;
use super::scanner::{scan_frame, Scan};
use crate::error::{ChannelError, Result};
use crate::utils::ChannelMetrics;

/// Replication frame codec.
#[derive(Debug, Default)]
pub struct FrameCodec {
    reassembler: Reassembler,
    next_sequence: u8,
    frames_decoded: u64,
    /// Bytes at the front of the read buffer already reported as received.
    accounted: usize,
    metrics: Option<Arc<ChannelMetrics>>,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec that refuses logical packets larger than `max_packet_size` bytes.
    pub fn with_max_packet_size(max_packet_size: usize) -> Self {
        Self {
            reassembler: Reassembler::new(max_packet_size),
            ..Self::default()
        }
    }

    /// Report received bytes and scanned frames to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<ChannelMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Start encoding at the given sequence number.
    pub fn with_sequence(mut self, sequence: u8) -> Self {
        self.next_sequence = sequence;
        self
    }

    /// Frames scanned so far, including non-terminal fragments.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Whether a multi-frame packet is partially collected.
    pub fn is_mid_packet(&self) -> bool {
        self.reassembler.is_accumulating()
    }

    /// Count bytes appended to `src` since the last decode call.
    fn account_received(&mut self, src: &BytesMut) {
        if src.len() > self.accounted {
            if let Some(metrics) = &self.metrics {
                metrics.bytes_arrived((src.len() - self.accounted) as u64);
            }
        }
        self.accounted = src.len();
    }

    /// Split one frame off the front of `src`, or reserve room for it.
    fn next_frame(&mut self, src: &mut BytesMut) -> Option<Bytes> {
        let (header, consumed) = match scan_frame(src) {
            Scan::Frame {
                header, consumed, ..
            } => (header, consumed),
            Scan::NeedMore { needed } => {
                src.reserve(needed);
                return None;
            }
        };

        trace!(
            body_len = header.body_len,
            sequence = header.sequence,
            "Frame scanned"
        );
        self.frames_decoded += 1;
        if let Some(metrics) = &self.metrics {
            metrics.frame_scanned();
        }

        let mut frame = src.split_to(consumed);
        self.accounted = self.accounted.saturating_sub(consumed);
        frame.advance(HEADER_LEN);
        Some(frame.freeze())
    }
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = ChannelError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.account_received(src);
        while let Some(body) = self.next_frame(src) {
            if let Some(packet) = self.reassembler.push(body)? {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if let Some(packet) = self.decode(src)? {
            return Ok(Some(packet));
        }
        if src.is_empty() && !self.reassembler.is_accumulating() {
            return Ok(None);
        }

        let err = ChannelError::TruncatedStream {
            buffered: src.len(),
            fragments: self.reassembler.pending_fragments(),
        };
        src.clear();
        self.accounted = 0;
        self.reassembler.reset();
        Err(err)
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = ChannelError;

    fn encode(&mut self, body: Bytes, dst: &mut BytesMut) -> Result<()> {
        self.next_sequence = encode_packet(&body, self.next_sequence, dst);
        Ok(())
    }
}
