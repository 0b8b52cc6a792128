use crate::url::ParsedUrl;
use std::fmt;

/// A serialized HTTP/1.0 request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    text: String,
}

impl Request {
    /// Builds a `GET` for `url`
    ///
    /// `referer` falls back to the target host when the page was not reached
    /// through a link (the seed).
    pub fn get(url: &ParsedUrl, user_agent: &str, referer: Option<&str>) -> Self {
        let referer = referer.unwrap_or_else(|| url.host());
        let text = format!(
            "GET /{path} HTTP/1.0\r\n\
             HOST: {host}\r\n\
             Accept: */*\r\n\
             Connection: Keep-Alive\r\n\
             User-Agent: {user_agent}\r\n\
             Referer: {referer}\r\n\
             \r\n",
            path = url.path(),
            host = url.host(),
        );
        Self { text }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
