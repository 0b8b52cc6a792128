use crate::http::{ByteStream, FrameError};
use std::future::Future;
use std::io;
use std::time::Duration;

/// First peek window when looking for the end of the header block
pub const INITIAL_HEAD_BUFFER: usize = 512;

/// Largest header block accepted
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Upper bound on the up-front body allocation; larger bodies grow as read
const BODY_PREALLOC_LIMIT: usize = 1 << 20;

/// Reads the response header block off `stream`
///
/// Bytes are peeked first and only consumed up to the blank line ending the
/// header block, so the body stays on the stream. The peek window starts at
/// [`INITIAL_HEAD_BUFFER`] and doubles up to [`MAX_HEAD_SIZE`]. A terminator
/// split across two peeks is still found because the last two consumed bytes
/// are scanned again with the next window.
///
/// The returned block holds the status line and headers without the trailing
/// blank line. A response whose first bytes are not `HTTP` has no header
/// block; nothing is consumed and an empty block is returned.
///
/// # Errors
///
/// - [`FrameError::ConnectionClosed`] if the peer closes before sending anything
/// - [`FrameError::ResponseTooLarge`] if no terminator shows up within the cap
/// - [`FrameError::Timeout`] if a single peek or read exceeds `timeout`
///
/// A peer closing after sending a partial header yields that partial block.
/// Interrupted peeks and reads are retried.
pub async fn read_head<S: ByteStream>(
    stream: &mut S,
    timeout: Duration,
) -> Result<Vec<u8>, FrameError> {
    let mut head: Vec<u8> = Vec::with_capacity(INITIAL_HEAD_BUFFER);
    let mut window = INITIAL_HEAD_BUFFER;
    let mut peeked = vec![0u8; window];

    loop {
        let room = MAX_HEAD_SIZE - head.len();
        if room == 0 {
            return Err(FrameError::ResponseTooLarge {
                limit: MAX_HEAD_SIZE,
            });
        }

        let want = window.min(room);
        peeked.resize(want, 0);
        let n = loop {
            match timed(timeout, stream.peek(&mut peeked[..want])).await {
                Err(FrameError::Io(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => break result?,
            }
        };
        if n == 0 {
            if head.is_empty() {
                return Err(FrameError::ConnectionClosed);
            }
            tracing::debug!("Peer closed inside the header block after {} bytes", head.len());
            return Ok(head);
        }

        if head.is_empty() && !is_status_prefix(&peeked[..n]) {
            return Ok(Vec::new());
        }

        let carry = head.len().min(2);
        let mut scan = Vec::with_capacity(carry + n);
        scan.extend_from_slice(&head[head.len() - carry..]);
        scan.extend_from_slice(&peeked[..n]);

        if let Some((start, len)) = find_terminator(&scan) {
            let consume = start + len - carry;
            let head_end = head.len() - carry + start;
            read_exact(stream, &mut head, consume, timeout).await?;
            head.truncate(head_end);
            if head.last() == Some(&b'\r') {
                head.pop();
            }
            return Ok(head);
        }

        read_exact(stream, &mut head, n, timeout).await?;
        window = (window * 2).min(MAX_HEAD_SIZE);
    }
}

/// Reads up to `len` body bytes, stopping early at EOF
pub async fn read_body<S: ByteStream>(
    stream: &mut S,
    len: usize,
    timeout: Duration,
) -> Result<Vec<u8>, FrameError> {
    let mut body = Vec::with_capacity(len.min(BODY_PREALLOC_LIMIT));
    let mut chunk = vec![0u8; INITIAL_HEAD_BUFFER * 16];

    while body.len() < len {
        let want = (len - body.len()).min(chunk.len());
        match timed(timeout, stream.read(&mut chunk[..want])).await {
            Ok(0) => {
                tracing::debug!("Body ended after {} of {} bytes", body.len(), len);
                break;
            }
            Ok(n) => body.extend_from_slice(&chunk[..n]),
            Err(FrameError::Io(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(body)
}

/// Consumes exactly `count` bytes that were already peeked, appending them to `out`
async fn read_exact<S: ByteStream>(
    stream: &mut S,
    out: &mut Vec<u8>,
    count: usize,
    timeout: Duration,
) -> Result<(), FrameError> {
    let start = out.len();
    out.resize(start + count, 0);
    let mut filled = start;

    while filled < out.len() {
        match timed(timeout, stream.read(&mut out[filled..])).await {
            Ok(0) => {
                out.truncate(filled);
                return Err(FrameError::ConnectionClosed);
            }
            Ok(n) => filled += n,
            Err(FrameError::Io(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                out.truncate(filled);
                return Err(e);
            }
        }
    }

    Ok(())
}

async fn timed<T>(
    timeout: Duration,
    fut: impl Future<Output = io::Result<T>>,
) -> Result<T, FrameError> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(FrameError::Timeout),
    }
}

/// True while the bytes seen so far can still be the start of `HTTP`
fn is_status_prefix(bytes: &[u8]) -> bool {
    let n = bytes.len().min(4);
    bytes[..n] == b"HTTP"[..n]
}

/// Finds the first `\n\n` or `\n\r\n`, returning its start and length
fn find_terminator(buf: &[u8]) -> Option<(usize, usize)> {
    buf.iter().enumerate().find_map(|(i, &b)| {
        if b != b'\n' {
            return None;
        }
        match buf.get(i + 1..) {
            Some([b'\n', ..]) => Some((i, 2)),
            Some([b'\r', b'\n', ..]) => Some((i, 3)),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockStream;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_head_crlf() {
        let mut stream = MockStream::new(["HTTP/1.0 200 OK\r\nContent-Length: 4\r\n\r\nBODY"]);
        let head = read_head(&mut stream, TIMEOUT).await.unwrap();
        assert_eq!(head, b"HTTP/1.0 200 OK\r\nContent-Length: 4");
        assert_eq!(stream.remaining(), b"BODY");
    }

    #[tokio::test]
    async fn test_head_bare_lf() {
        let mut stream = MockStream::new(["HTTP/1.1 404 Not Found\nServer: x\n\n<html>"]);
        let head = read_head(&mut stream, TIMEOUT).await.unwrap();
        assert_eq!(head, b"HTTP/1.1 404 Not Found\nServer: x");
        assert_eq!(stream.remaining(), b"<html>");
    }

    #[tokio::test]
    async fn test_terminator_split_across_peeks() {
        let mut stream = MockStream::new(["HTTP/1.0 200 OK\r\nA: b\r\n\r", "\nBODY"]);
        let head = read_head(&mut stream, TIMEOUT).await.unwrap();
        assert_eq!(head, b"HTTP/1.0 200 OK\r\nA: b");
        assert_eq!(stream.remaining(), b"BODY");
    }

    #[tokio::test]
    async fn test_terminator_split_after_first_newline() {
        let mut stream = MockStream::new(["HTTP/1.0 200 OK\r\nA: b\r\n", "\r\nBODY"]);
        let head = read_head(&mut stream, TIMEOUT).await.unwrap();
        assert_eq!(head, b"HTTP/1.0 200 OK\r\nA: b");
        assert_eq!(stream.remaining(), b"BODY");
    }

    #[tokio::test]
    async fn test_head_larger_than_first_window() {
        let filler = "x".repeat(2000);
        let response = format!("HTTP/1.0 200 OK\r\nX-Filler: {}\r\n\r\nrest", filler);
        let mut stream = MockStream::new([response.as_str()]);

        let head = read_head(&mut stream, TIMEOUT).await.unwrap();
        assert!(head.ends_with(filler.as_bytes()));
        assert_eq!(stream.remaining(), b"rest");
    }

    #[tokio::test]
    async fn test_head_too_large() {
        let response = format!("HTTP/1.0 200 OK\r\nX: {}", "y".repeat(MAX_HEAD_SIZE));
        let mut stream = MockStream::new([response.as_str()]);

        let result = read_head(&mut stream, TIMEOUT).await;
        assert!(matches!(
            result,
            Err(FrameError::ResponseTooLarge { limit: MAX_HEAD_SIZE })
        ));
    }

    #[tokio::test]
    async fn test_no_status_line() {
        let mut stream = MockStream::new(["<html>plain</html>"]);
        let head = read_head(&mut stream, TIMEOUT).await.unwrap();
        assert!(head.is_empty());
        assert_eq!(stream.remaining(), b"<html>plain</html>");
    }

    #[tokio::test]
    async fn test_closed_before_data() {
        let mut stream = MockStream::new(Vec::<&str>::new());
        let result = read_head(&mut stream, TIMEOUT).await;
        assert!(matches!(result, Err(FrameError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_closed_mid_head() {
        let mut stream = MockStream::new(["HTTP/1.0 200 OK\r\nA: b"]);
        let head = read_head(&mut stream, TIMEOUT).await.unwrap();
        assert_eq!(head, b"HTTP/1.0 200 OK\r\nA: b");
    }

    #[tokio::test]
    async fn test_peek_timeout() {
        let mut stream = MockStream::stalled();
        let result = read_head(&mut stream, Duration::from_millis(50)).await;
        assert!(matches!(result, Err(FrameError::Timeout)));
    }

    #[tokio::test]
    async fn test_read_body_exact_and_short() {
        let mut stream = MockStream::new(["0123", "456789"]);
        let body = read_body(&mut stream, 6, TIMEOUT).await.unwrap();
        assert_eq!(body, b"012345");
        assert_eq!(stream.remaining(), b"6789");

        let body = read_body(&mut stream, 100, TIMEOUT).await.unwrap();
        assert_eq!(body, b"6789");
    }

    #[tokio::test]
    async fn test_head_survives_interrupted_reads() {
        let mut stream = MockStream::new(["HTTP/1.0 200 OK\r\n", "A: b\r\n\r\nBODY"])
            .interrupting_peeks(1)
            .interrupting_reads(2);

        let head = read_head(&mut stream, TIMEOUT).await.unwrap();
        assert_eq!(head, b"HTTP/1.0 200 OK\r\nA: b");
        assert_eq!(stream.remaining(), b"BODY");
    }

    #[tokio::test]
    async fn test_body_survives_interrupted_reads() {
        let mut stream = MockStream::new(["0123", "4567"]).interrupting_reads(3);
        let body = read_body(&mut stream, 8, TIMEOUT).await.unwrap();
        assert_eq!(body, b"01234567");
        assert!(stream.remaining().is_empty());
    }

    #[test]
    fn test_find_terminator() {
        assert_eq!(find_terminator(b"a\r\n\r\nb"), Some((2, 3)));
        assert_eq!(find_terminator(b"a\n\nb"), Some((1, 2)));
        assert_eq!(find_terminator(b"a\r\nb\r\n"), None);
    }
}
