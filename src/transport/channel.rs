//! # Packet Channel
//!
//! Consumer-facing handle over a background receive loop.
//!
//! ```text
//! byte source -> FrameCodec -> interpreter -> bounded queue -> PacketChannel -> consumer
//! ```
//!
//! The queue is a bounded `tokio::sync::mpsc` channel with one producer (the
//! receive loop) and one consumer (this handle). Entries arrive in wire order.
//! A failure is delivered once, in sequence, after which the channel reports
//! end of stream.
//!
//! ## Example
//! ```rust,no_run
//! use repl_wire::{ChannelConfig, PacketChannel, RawInterpreter};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> repl_wire::Result<()> {
//!     let stream = tokio::net::TcpStream::connect("127.0.0.1:3306").await?;
//!     let (reader, _writer) = tokio::io::split(stream);
//!
//!     let mut channel = PacketChannel::spawn(reader, RawInterpreter, &ChannelConfig::default())?;
//!     let cancel = CancellationToken::new();
//!     while let Some(packet) = channel.read_packet(&cancel).await? {
//!         println!("packet of {} bytes", packet.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{info_span, warn, Instrument};

use super::receive::{Entry, ReceiveLoop};
use crate::config::ChannelConfig;
use crate::core::codec::FrameCodec;
use crate::error::{ChannelError, Result};
use crate::protocol::interpreter::PacketInterpreter;
use crate::utils::metrics::ChannelMetrics;

/// Handle for reading decoded packets from a replication stream.
///
/// Dropping the handle stops the receive loop and releases the byte source.
pub struct PacketChannel<P> {
    name: Arc<str>,
    queue: mpsc::Receiver<Entry<P>>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
    metrics: Arc<ChannelMetrics>,
}

impl<P: Send + 'static> PacketChannel<P> {
    /// Start receiving from `reader` on the current tokio runtime.
    ///
    /// The configuration is validated first. To read from a duplex stream,
    /// split it with `tokio::io::split` and pass the read half.
    pub fn spawn<R, I>(reader: R, interpreter: I, config: &ChannelConfig) -> Result<Self>
    where
        R: AsyncRead + Unpin + Send + 'static,
        I: PacketInterpreter<Packet = P>,
    {
        config.validate_strict()?;

        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let shutdown = CancellationToken::new();
        let metrics = Arc::new(ChannelMetrics::new());

        let frames = FramedRead::with_capacity(
            reader,
            FrameCodec::with_max_packet_size(config.max_packet_size).with_metrics(metrics.clone()),
            config.read_buffer_capacity,
        );
        let receive = ReceiveLoop::new(frames, interpreter, tx, shutdown.clone(), metrics.clone());
        let span = info_span!("receive_loop", channel = %config.name);
        let task = tokio::spawn(receive.run().instrument(span));

        Ok(Self {
            name: Arc::from(config.name.as_str()),
            queue: rx,
            shutdown,
            task: Some(task),
            metrics,
        })
    }
}

impl<P> PacketChannel<P> {
    /// Wait for the next packet.
    ///
    /// - `Ok(Some(packet))`: the next packet in wire order
    /// - `Ok(None)`: the stream has ended and every packet has been read
    /// - `Err(ChannelError::Receive { .. })`: the receive loop failed; later reads return `Ok(None)`
    /// - `Err(ChannelError::Cancelled)`: `cancel` fired first; nothing was consumed
    pub async fn read_packet(&mut self, cancel: &CancellationToken) -> Result<Option<P>> {
        let entry = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ChannelError::Cancelled),
            entry = self.queue.recv() => entry,
        };
        self.unwrap_entry(entry).transpose()
    }

    /// Name given in the channel configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Counters shared with the receive loop.
    pub fn metrics(&self) -> &Arc<ChannelMetrics> {
        &self.metrics
    }

    /// Whether the receive loop has exited. Queued packets may still be readable.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the receive loop and wait until it has released the byte source.
    pub async fn close(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(channel = %self.name, error = %e, "Receive loop ended abnormally");
            }
        }
    }

    fn unwrap_entry(&self, entry: Option<Entry<P>>) -> Option<Result<P>> {
        entry.map(|entry| entry.map_err(|cause| ChannelError::wrap(&self.name, cause)))
    }
}

impl<P> Stream for PacketChannel<P> {
    type Item = Result<P>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        this.queue
            .poll_recv(cx)
            .map(|entry| this.unwrap_entry(entry))
    }
}

impl<P> Drop for PacketChannel<P> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl<P> std::fmt::Debug for PacketChannel<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketChannel")
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}
