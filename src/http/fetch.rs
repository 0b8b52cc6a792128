use crate::http::{
    read_body, read_head, ByteStream, FetchError, FrameError, Request, ResponseHead, Transport,
};
use crate::url::parse_url;
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub head: ResponseHead,
    pub body: Vec<u8>,
}

impl Page {
    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Fetches `url` with a single HTTP/1.0 `GET`
///
/// Only `200` responses that announce a `Content-Length` are accepted; the
/// body is read up to that length. The stream is closed whatever the outcome.
pub async fn fetch_page<T: Transport>(
    transport: &T,
    url: &str,
    referer: Option<&str>,
    user_agent: &str,
    timeout: Duration,
) -> Result<Page, FetchError> {
    let parsed = parse_url(url)?;
    let mut stream = transport
        .connect(parsed.host(), parsed.port(), timeout)
        .await
        .map_err(|source| FetchError::Connect {
            host: parsed.host().to_string(),
            port: parsed.port(),
            source,
        })?;

    let request = Request::get(&parsed, user_agent, referer);
    let result = exchange(&mut stream, &request, timeout).await;

    if let Err(e) = stream.close().await {
        tracing::debug!("Closing stream for {} failed: {}", url, e);
    }

    let (head, body) = result?;
    Ok(Page {
        url: url.to_string(),
        head,
        body,
    })
}

async fn exchange<S: ByteStream>(
    stream: &mut S,
    request: &Request,
    timeout: Duration,
) -> Result<(ResponseHead, Vec<u8>), FetchError> {
    match tokio::time::timeout(timeout, stream.write_all(request.as_bytes())).await {
        Ok(written) => written.map_err(FrameError::from)?,
        Err(_) => return Err(FrameError::Timeout.into()),
    }

    let head = ResponseHead::parse(&read_head(stream, timeout).await?);
    let status = head.status();
    if status != 200 {
        return Err(FetchError::Status(status));
    }

    let length = head.content_length().ok_or(FetchError::MissingLength)?;
    let length = usize::try_from(length).map_err(|_| FetchError::MissingLength)?;
    let body = read_body(stream, length, timeout).await?;
    Ok((head, body))
}
