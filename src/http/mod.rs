//! Minimal HTTP/1.0 client
//!
//! Requests are written by hand and responses are framed straight off the
//! byte stream:
//! - [`read_head`] peeks for the blank line that ends the header block and
//!   consumes exactly that much, leaving the body on the stream
//! - [`ResponseHead`] answers status and header queries over the raw block
//! - [`read_body`] reads the announced number of body bytes
//!
//! Streams come from a [`Transport`]; [`TcpTransport`] is the real one.

mod fetch;
mod framer;
mod head;
mod request;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use fetch::{fetch_page, Page};
pub use framer::{read_body, read_head, INITIAL_HEAD_BUFFER, MAX_HEAD_SIZE};
pub use head::ResponseHead;
pub use request::Request;
pub use transport::{ByteStream, TcpStreamHandle, TcpTransport, Transport};

use crate::UrlError;
use std::io;
use thiserror::Error;

/// Errors raised while framing a response off a stream
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Response header exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("Connection closed before any response data")]
    ConnectionClosed,

    #[error("Timed out waiting for the peer")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while fetching one page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    Url(#[from] UrlError),

    #[error("Failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Unexpected HTTP status {0}")]
    Status(i32),

    #[error("Response carries no usable Content-Length")]
    MissingLength,
}

impl FetchError {
    /// True for failures caused by the peer rather than by the URL
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Frame(_))
    }
}
