//! Scripted byte source shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// One step of a scripted read sequence.
#[derive(Debug)]
pub enum Step {
    /// Bytes handed out, possibly over several reads if the buffer is small.
    Data(Vec<u8>),
    /// A read that fails with this kind.
    Fail(io::ErrorKind),
    /// A read that never completes.
    Stall,
}

/// `AsyncRead` that replays a fixed script and reports end of stream after it.
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    released: Arc<AtomicBool>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps
                .into_iter()
                .filter(|step| !matches!(step, Step::Data(d) if d.is_empty()))
                .collect(),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replay `wire` cut into pieces of the given sizes, cycling through `sizes`.
    pub fn chunked(wire: &[u8], sizes: &[usize]) -> Self {
        let mut steps = Vec::new();
        let mut rest = wire;
        for size in sizes.iter().cycle() {
            if rest.is_empty() {
                break;
            }
            let n = (*size).clamp(1, rest.len());
            steps.push(Step::Data(rest[..n].to_vec()));
            rest = &rest[n..];
        }
        Self::new(steps)
    }

    /// Flag set once the source has been dropped.
    pub fn released_flag(&self) -> Arc<AtomicBool> {
        self.released.clone()
    }
}

impl AsyncRead for ScriptedSource {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.steps.front_mut() {
            None => Poll::Ready(Ok(())),
            Some(Step::Stall) => Poll::Pending,
            Some(Step::Fail(kind)) => {
                let kind = *kind;
                self.steps.pop_front();
                Poll::Ready(Err(io::Error::new(kind, "scripted failure")))
            }
            Some(Step::Data(data)) => {
                let n = data.len().min(buf.remaining());
                buf.put_slice(&data[..n]);
                data.drain(..n);
                if data.is_empty() {
                    self.steps.pop_front();
                }
                Poll::Ready(Ok(()))
            }
        }
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Deterministic body of `len` bytes whose content depends on `seed`.
pub fn body(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}
