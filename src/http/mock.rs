//! Scripted in-memory streams for tests

use crate::http::{ByteStream, Transport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Serves a fixed list of chunks; a peek never looks past the current chunk
#[derive(Debug, Default)]
pub(crate) struct MockStream {
    chunks: VecDeque<Vec<u8>>,
    stalled: bool,
    interrupted_peeks: usize,
    interrupted_reads: usize,
    written: Arc<Mutex<Vec<u8>>>,
    closed: Arc<Mutex<bool>>,
}

impl MockStream {
    pub(crate) fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            chunks: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
            ..Self::default()
        }
    }

    /// A stream whose peeks and reads never complete
    pub(crate) fn stalled() -> Self {
        Self {
            stalled: true,
            ..Self::default()
        }
    }

    /// Fails the next `count` peeks with [`io::ErrorKind::Interrupted`]
    pub(crate) fn interrupting_peeks(mut self, count: usize) -> Self {
        self.interrupted_peeks = count;
        self
    }

    /// Fails the next `count` reads with [`io::ErrorKind::Interrupted`]
    pub(crate) fn interrupting_reads(mut self, count: usize) -> Self {
        self.interrupted_reads = count;
        self
    }

    /// Bytes not yet consumed
    pub(crate) fn remaining(&self) -> Vec<u8> {
        self.chunks.iter().flatten().copied().collect()
    }

    async fn stall(&self) {
        if self.stalled {
            std::future::pending::<()>().await;
        }
    }
}

fn interrupt(pending: &mut usize) -> io::Result<()> {
    if *pending == 0 {
        return Ok(());
    }
    *pending -= 1;
    Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"))
}

impl ByteStream for MockStream {
    async fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stall().await;
        interrupt(&mut self.interrupted_peeks)?;
        let Some(chunk) = self.chunks.front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stall().await;
        interrupt(&mut self.interrupted_reads)?;
        let Some(chunk) = self.chunks.front_mut() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        chunk.drain(..n);
        if chunk.is_empty() {
            self.chunks.pop_front();
        }
        Ok(n)
    }

    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.written.lock().extend_from_slice(buf);
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        *self.closed.lock() = true;
        Ok(())
    }
}

/// Hands out a [`MockStream`] per connection, replaying the same response
#[derive(Debug, Clone, Default)]
pub(crate) struct MockTransport {
    response: Vec<Vec<u8>>,
    refuse: bool,
    pub(crate) requests: Arc<Mutex<Vec<u8>>>,
    pub(crate) closed: Arc<Mutex<bool>>,
}

impl MockTransport {
    pub(crate) fn replying<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            response: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub(crate) fn request_text(&self) -> String {
        String::from_utf8_lossy(&self.requests.lock()).into_owned()
    }
}

impl Transport for MockTransport {
    type Stream = MockStream;

    async fn connect(&self, _host: &str, _port: u16, _timeout: Duration) -> io::Result<MockStream> {
        if self.refuse {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        Ok(MockStream {
            chunks: self.response.iter().cloned().collect(),
            stalled: false,
            interrupted_peeks: 0,
            interrupted_reads: 0,
            written: Arc::clone(&self.requests),
            closed: Arc::clone(&self.closed),
        })
    }
}
