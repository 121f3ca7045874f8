//! # Fragment Reassembler
//!
//! Joins consecutive maximum-length frame bodies and the shorter frame that ends
//! them into one logical packet body.
//!
//! ```text
//! Idle ──[len < MAX]──> emit body, stay Idle
//! Idle ──[len == MAX]──> Accumulating
//! Accumulating ──[len == MAX]──> append, stay Accumulating
//! Accumulating ──[len < MAX]──> append, concatenate, emit, Idle
//! ```
//!
//! Fragments are held as owned [`Bytes`] in arrival order, so appending is O(1)
//! and the final concatenation copies each byte exactly once. A packet that
//! never spans frames is passed through without copying.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use super::frame::MAX_FRAME_BODY_LEN;
use crate::error::{ChannelError, Result};

#[derive(Debug)]
enum State {
    Idle,
    Accumulating {
        fragments: Vec<Bytes>,
        total: usize,
    },
}

/// Two-state reassembly machine for one stream. Only one logical packet can be
/// in progress at a time.
#[derive(Debug)]
pub struct Reassembler {
    state: State,
    max_packet_size: usize,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

impl Reassembler {
    /// Create a reassembler that rejects logical packets larger than `max_packet_size`.
    pub fn new(max_packet_size: usize) -> Self {
        Self {
            state: State::Idle,
            max_packet_size,
        }
    }

    /// Feed one frame body.
    ///
    /// Returns the complete logical body once the terminal fragment arrives,
    /// `None` while a multi-frame packet is still being collected.
    pub fn push(&mut self, fragment: Bytes) -> Result<Option<Bytes>> {
        let continues = fragment.len() == MAX_FRAME_BODY_LEN;

        match &mut self.state {
            State::Idle if !continues => {
                self.check_size(fragment.len())?;
                Ok(Some(fragment))
            }
            State::Idle => {
                self.check_size(fragment.len())?;
                self.state = State::Accumulating {
                    total: fragment.len(),
                    fragments: vec![fragment],
                };
                Ok(None)
            }
            State::Accumulating { fragments, total } => {
                let size = *total + fragment.len();
                if size > self.max_packet_size {
                    self.state = State::Idle;
                    return Err(ChannelError::OversizedPacket {
                        size,
                        limit: self.max_packet_size,
                    });
                }
                *total = size;
                fragments.push(fragment);
                if continues {
                    return Ok(None);
                }

                let fragments = std::mem::take(fragments);
                self.state = State::Idle;
                debug!(fragments = fragments.len(), bytes = size, "Reassembled multipart packet");
                Ok(Some(concat(fragments, size)))
            }
        }
    }

    /// Whether a multi-frame packet is partially collected.
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, State::Accumulating { .. })
    }

    /// Number of fragments held for the packet in progress.
    pub fn pending_fragments(&self) -> usize {
        match &self.state {
            State::Idle => 0,
            State::Accumulating { fragments, .. } => fragments.len(),
        }
    }

    /// Discard any partially collected packet.
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_packet_size {
            return Err(ChannelError::OversizedPacket {
                size,
                limit: self.max_packet_size,
            });
        }
        Ok(())
    }
}

fn concat(fragments: Vec<Bytes>, total: usize) -> Bytes {
    let mut body = BytesMut::with_capacity(total);
    for fragment in fragments {
        body.extend_from_slice(&fragment);
    }
    body.freeze()
}
