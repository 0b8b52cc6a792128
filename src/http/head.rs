use std::ops::Range;

/// A parsed response header block
///
/// Keeps the raw text and one span per logical line, status line first.
/// Continuation lines (starting with a space or tab) belong to the span of
/// the line before them.
#[derive(Debug, Clone, Default)]
pub struct ResponseHead {
    raw: String,
    lines: Vec<Range<usize>>,
}

impl ResponseHead {
    /// Splits a header block as returned by [`read_head`](crate::http::read_head)
    pub fn parse(bytes: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(bytes).into_owned();
        let mut lines: Vec<Range<usize>> = Vec::new();
        let mut offset = 0;

        for piece in raw.split_inclusive('\n') {
            let start = offset;
            offset += piece.len();
            let line = piece.trim_end_matches(['\r', '\n']);
            let end = start + line.len();

            if line.is_empty() {
                break;
            }

            match lines.last_mut() {
                Some(prev) if line.starts_with([' ', '\t']) => prev.end = end,
                _ => lines.push(start..end),
            }
        }

        Self { raw, lines }
    }

    /// Returns true if the response had no header block at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The status line, if any
    pub fn status_line(&self) -> Option<&str> {
        self.lines.first().map(|span| &self.raw[span.clone()])
    }

    /// Status code from the status line
    ///
    /// A response without a header block counts as `200`. A status line that
    /// is not `HTTP[/d.d] <3 digits>` yields `-1`.
    pub fn status(&self) -> i32 {
        match self.status_line() {
            None => 200,
            Some(line) => parse_status(line).unwrap_or(-1),
        }
    }

    /// Value of the first header named `name` (ASCII case-insensitive), trimmed
    pub fn header(&self, name: &str) -> Option<&str> {
        self.lines.iter().skip(1).find_map(|span| {
            let line = &self.raw[span.clone()];
            let key = line.get(..name.len())?;
            let rest = line.get(name.len()..)?;
            if !key.eq_ignore_ascii_case(name) {
                return None;
            }
            rest.strip_prefix(':').map(str::trim)
        })
    }

    /// `Content-Length` as a byte count; `None` if missing, malformed or negative
    pub fn content_length(&self) -> Option<u64> {
        self.header("Content-Length")?.parse().ok()
    }

    /// Iterates over the header lines after the status line
    pub fn header_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().skip(1).map(|span| &self.raw[span.clone()])
    }
}

fn parse_status(line: &str) -> Option<i32> {
    let mut rest = line.strip_prefix("HTTP")?;

    if let Some(version) = rest.strip_prefix('/') {
        let major = version.find(|c: char| !c.is_ascii_digit())?;
        let after_major = version[major..].strip_prefix('.')?;
        if major == 0 {
            return None;
        }
        let minor = after_major
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after_major.len());
        if minor == 0 {
            return None;
        }
        rest = &after_major[minor..];
    }

    let code = rest.trim_start_matches([' ', '\t']);
    if code.len() == rest.len() {
        return None;
    }

    let digits = code.get(..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if code[3..].starts_with(|c: char| !c.is_whitespace()) {
        return None;
    }
    digits.parse().ok()
}
