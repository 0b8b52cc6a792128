use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A connected, bidirectional byte stream
///
/// `peek` must return buffered bytes without consuming them, so the framer
/// can look for the end of the header block before deciding how much to read.
pub trait ByteStream: Send {
    /// Copies available bytes into `buf` without consuming them; 0 means EOF
    fn peek(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;

    /// Consumes up to `buf.len()` bytes; 0 means EOF
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;

    fn write_all(&mut self, buf: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// Shuts the stream down; the stream must not be used afterwards
    fn close(&mut self) -> impl Future<Output = io::Result<()>> + Send;
}

/// Opens streams to `host:port`
pub trait Transport: Send + Sync + 'static {
    type Stream: ByteStream;

    /// Connects, failing with `io::ErrorKind::TimedOut` after `timeout`
    fn connect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Plain TCP transport
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport;

/// Stream handed out by [`TcpTransport`]
#[derive(Debug)]
pub struct TcpStreamHandle {
    inner: TcpStream,
}

impl Transport for TcpTransport {
    type Stream = TcpStreamHandle;

    async fn connect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> io::Result<TcpStreamHandle> {
        let connect = TcpStream::connect((host, port));
        let inner = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))??;
        inner.set_nodelay(true)?;
        Ok(TcpStreamHandle { inner })
    }
}

impl ByteStream for TcpStreamHandle {
    async fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.peek(buf).await
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        AsyncReadExt::read(&mut self.inner, buf).await
    }

    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        AsyncWriteExt::write_all(&mut self.inner, buf).await?;
        self.inner.flush().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.inner.shutdown().await
    }
}
