//! Background receive loop.
//!
//! Reads the byte source through a [`FramedRead`] over [`FrameCodec`], runs each
//! completed body through the interpreter and pushes the outcome onto the
//! delivery queue. A full queue suspends the loop, which in turn stops reads
//! from the byte source.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::codec::FrameCodec;
use crate::error::{constants, ChannelError, Result};
use crate::protocol::interpreter::PacketInterpreter;
use crate::utils::metrics::ChannelMetrics;

pub(crate) type Entry<P> = Result<P>;

pub(crate) struct ReceiveLoop<R, I: PacketInterpreter> {
    frames: FramedRead<R, FrameCodec>,
    interpreter: I,
    queue: mpsc::Sender<Entry<I::Packet>>,
    shutdown: CancellationToken,
    metrics: Arc<ChannelMetrics>,
    frames_seen: u64,
}

impl<R, I> ReceiveLoop<R, I>
where
    R: AsyncRead + Unpin,
    I: PacketInterpreter,
{
    pub(crate) fn new(
        frames: FramedRead<R, FrameCodec>,
        interpreter: I,
        queue: mpsc::Sender<Entry<I::Packet>>,
        shutdown: CancellationToken,
        metrics: Arc<ChannelMetrics>,
    ) -> Self {
        Self {
            frames,
            interpreter,
            queue,
            shutdown,
            metrics,
            frames_seen: 0,
        }
    }

    /// Run until the source closes, a failure has been delivered, the consumer
    /// goes away, or shutdown is requested. The byte source is dropped on return.
    pub(crate) async fn run(mut self) {
        debug!("Receive loop started");

        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    debug!("Receive loop cancelled while reading");
                    break;
                }
                next = self.frames.next() => next,
            };

            let entry = match next {
                None => {
                    debug!("Byte source closed cleanly");
                    break;
                }
                Some(Ok(body)) => self.interpret(body),
                Some(Err(e)) => Err(e),
            };

            if !self.deliver(entry).await {
                break;
            }
        }

        self.metrics.log_metrics();
    }

    fn interpret(&mut self, body: Bytes) -> Entry<I::Packet> {
        let frames = self.frames.decoder().frames_decoded();
        self.metrics
            .packet_assembled(frames - self.frames_seen, body.len() as u64);
        self.frames_seen = frames;

        let interpreter = &mut self.interpreter;
        match panic::catch_unwind(AssertUnwindSafe(move || interpreter.interpret(body))) {
            Ok(Ok(packet)) => Ok(packet),
            Ok(Err(e)) => Err(ChannelError::Interpreter(e)),
            Err(_) => Err(ChannelError::Interpreter(
                constants::ERR_INTERPRETER_PANICKED.into(),
            )),
        }
    }

    /// Push one entry. Returns whether the loop should keep receiving.
    async fn deliver(&mut self, entry: Entry<I::Packet>) -> bool {
        let failed = entry.is_err();
        if let Err(e) = &entry {
            warn!(error = %e, "Delivering receive failure to consumer");
        }

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => {
                debug!("Receive loop cancelled while delivering");
                return false;
            }
            sent = self.queue.send(entry) => {
                if sent.is_err() {
                    debug!("Consumer dropped the channel");
                    return false;
                }
            }
        }

        if failed {
            self.metrics.failure();
            false
        } else {
            self.metrics.packet_delivered();
            true
        }
    }
}
