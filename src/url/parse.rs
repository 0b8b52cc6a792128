use crate::{UrlError, UrlResult};
use std::fmt;
use std::str::FromStr;

/// The only scheme the crawler speaks
pub const HTTP_SCHEME: &str = "http://";

/// Port used when the URL does not name one
pub const HTTP_DEFAULT_PORT: u16 = 80;

/// A validated `http://` URL split into the parts the transport needs
///
/// `path` is everything after the `/` that ends the authority, without that
/// slash and without any `#fragment`. The query string is kept because it is
/// part of the request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    url: String,
    host: String,
    port: u16,
    path: String,
}

impl ParsedUrl {
    /// The original string this URL was parsed from
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl FromStr for ParsedUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_url(s)
    }
}

/// Returns true if `url` starts with `http://`, ignoring ASCII case
pub fn has_scheme(url: &str) -> bool {
    url.get(..HTTP_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(HTTP_SCHEME))
}

/// Returns the scheme name of `link`, if it starts with one
///
/// A scheme is a letter followed by letters, digits, `+`, `-` or `.`, ending
/// at a `:` that comes before any `/`, `?` or `#`.
pub fn link_scheme(link: &str) -> Option<&str> {
    let colon = link.find(':')?;
    let scheme = &link[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(scheme)
}

/// True if `link` names a scheme other than `http`
///
/// Such links can never be fetched and must not be merged as relative paths.
pub fn is_foreign_scheme(link: &str) -> bool {
    link_scheme(link).is_some_and(|scheme| !scheme.eq_ignore_ascii_case("http"))
}

/// Parses an absolute `http://` URL
///
/// # Rules
///
/// - The scheme must be a literal `http://` (any case); anything else is
///   [`UrlError::MissingScheme`]
/// - The host runs up to the first `:` or `/` and must not be empty
/// - An explicit port must be all digits and at most 65535; an empty port
///   after the colon keeps the default of 80
///
/// # Examples
///
/// ```
/// use webrank::url::parse_url;
///
/// let url = parse_url("http://example.com:8080/docs/index.html").unwrap();
/// assert_eq!(url.host(), "example.com");
/// assert_eq!(url.port(), 8080);
/// assert_eq!(url.path(), "docs/index.html");
///
/// assert!(parse_url("ftp://example.com/").is_err());
/// ```
pub fn parse_url(raw: &str) -> UrlResult<ParsedUrl> {
    if !has_scheme(raw) {
        return Err(UrlError::MissingScheme(raw.to_string()));
    }

    let rest = &raw[HTTP_SCHEME.len()..];
    let host_end = rest.find([':', '/']).unwrap_or(rest.len());
    let host = &rest[..host_end];
    if host.is_empty() {
        return Err(UrlError::InvalidHost(raw.to_string()));
    }

    let mut tail = &rest[host_end..];
    let mut port = HTTP_DEFAULT_PORT;
    if let Some(after_colon) = tail.strip_prefix(':') {
        let port_end = after_colon.find('/').unwrap_or(after_colon.len());
        let digits = &after_colon[..port_end];
        if !digits.is_empty() {
            port = parse_port(digits).ok_or_else(|| UrlError::BadPort(raw.to_string()))?;
        }
        tail = &after_colon[port_end..];
    }

    let path = match tail.strip_prefix('/') {
        Some(after_slash) => {
            let end = after_slash.find('#').unwrap_or(after_slash.len());
            &after_slash[..end]
        }
        None => "",
    };

    Ok(ParsedUrl {
        url: raw.to_string(),
        host: host.to_string(),
        port,
        path: path.to_string(),
    })
}

fn parse_port(digits: &str) -> Option<u16> {
    let value = digits.bytes().try_fold(0u32, |acc, b| {
        if !b.is_ascii_digit() {
            return None;
        }
        let next = acc * 10 + u32::from(b - b'0');
        (next <= u32::from(u16::MAX)).then_some(next)
    })?;
    u16::try_from(value).ok()
}

/// Turns a scheme-less seed such as `example.com/index.html` into an
/// `http://` URL
///
/// Returns `None` when the input already has the http scheme, names some
/// other scheme (`ftp://...`), or starts with a separator.
pub fn rewrite_shorthand(raw: &str) -> Option<String> {
    if raw.is_empty() || has_scheme(raw) {
        return None;
    }

    match raw.find([':', '/']) {
        Some(0) => None,
        Some(i) if raw[i..].starts_with("://") => None,
        _ => Some(format!("{}{}", HTTP_SCHEME, raw)),
    }
}
