use crate::url::parse::{has_scheme, HTTP_SCHEME};
use crate::url::path_end;

/// Removes `.` and `..` segments from a URL or path, in place
///
/// `..` backs up to the previous `/` boundary but never above the root: the
/// `/` after the authority for a full URL, or the leading `/` of an absolute
/// path. Empty segments, the query and the fragment are left alone.
///
/// Returns true if the string was changed.
///
/// # Examples
///
/// ```
/// use webrank::url::simplify;
///
/// let mut url = String::from("http://x.com/a/b/../c/./d.html");
/// assert!(simplify(&mut url));
/// assert_eq!(url, "http://x.com/a/c/d.html");
///
/// let mut path = String::from("/../a");
/// simplify(&mut path);
/// assert_eq!(path, "/a");
/// ```
pub fn simplify(url: &mut String) -> bool {
    let root = root_len(url);
    let rest = &url[root..];
    let end = path_end(rest);
    let path = &rest[..end];

    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut kept: Vec<&str> = Vec::with_capacity(segments.len());
    let mut trailing_slash = false;

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "." => trailing_slash = i == last,
            ".." => {
                kept.pop();
                trailing_slash = i == last;
            }
            other => {
                kept.push(other);
                trailing_slash = false;
            }
        }
    }

    let mut simplified = String::with_capacity(url.len());
    simplified.push_str(&url[..root]);
    simplified.push_str(&kept.join("/"));
    if trailing_slash && !kept.is_empty() {
        simplified.push('/');
    }
    simplified.push_str(&rest[end..]);

    if simplified == *url {
        return false;
    }
    *url = simplified;
    true
}

/// Length of the part of `url` that dot segments can never remove
fn root_len(url: &str) -> usize {
    if has_scheme(url) {
        let authority = HTTP_SCHEME.len();
        let end = path_end(url);
        return match url[authority..end].find('/') {
            Some(i) => authority + i + 1,
            None => end,
        };
    }
    usize::from(url.starts_with('/'))
}
