use crate::url::parse::has_scheme;
use crate::url::path_end;

/// Merges a link found on a page with the URL of that page
///
/// The rules are applied in order:
///
/// 1. A link that already carries the `http://` scheme is returned unchanged
/// 2. An empty link resolves to `base`
/// 3. `?query` replaces the query and fragment of `base`; `#fragment`
///    replaces only the fragment
/// 4. `//host/path` keeps only the scheme of `base`
/// 5. `/path` keeps the scheme and authority of `base`
/// 6. Anything else replaces the last path segment of `base`; a base with
///    no path gets an explicit `/` first
///
/// The result is not simplified; pass it through [`simplify`](super::simplify)
/// (or use [`resolve`](super::resolve)) to get the canonical form.
///
/// # Examples
///
/// ```
/// use webrank::url::merge;
///
/// assert_eq!(merge("http://x.com/a/b.html", "c.html"), "http://x.com/a/c.html");
/// assert_eq!(merge("http://x.com/a/b.html", "/d"), "http://x.com/d");
/// assert_eq!(merge("http://x.com/a/b.html", "//y.com/d"), "http://y.com/d");
/// assert_eq!(merge("http://x.com/a/b.html", "?q=1"), "http://x.com/a/b.html?q=1");
/// ```
pub fn merge(base: &str, link: &str) -> String {
    if has_scheme(link) {
        return link.to_string();
    }
    if link.is_empty() {
        return base.to_string();
    }

    let end = path_end(base);
    let head = &base[..end];

    if link.starts_with('?') {
        return format!("{}{}", head, link);
    }

    if link.starts_with('#') {
        let cut = base.find('#').unwrap_or(base.len());
        return format!("{}{}", &base[..cut], link);
    }

    if link.starts_with("//") {
        // keep "http:" and splice the network-path reference after it
        let start = match head.find('/') {
            Some(i) if base[i + 1..].starts_with('/') => i,
            _ => 0,
        };
        return format!("{}{}", &base[..start], link);
    }

    if link.starts_with('/') {
        let start = match head.find('/') {
            Some(i) if base[i + 1..].starts_with('/') => {
                let authority = i + 2;
                head[authority..].find('/').map_or(end, |j| authority + j)
            }
            _ => 0,
        };
        return format!("{}{}", &base[..start], link);
    }

    match head.rfind('/') {
        None => link.to_string(),
        // the last slash belongs to "://", so base has no path at all
        Some(i) if i > 2 && head[..i].ends_with(":/") => format!("{}/{}", head, link),
        Some(i) => format!("{}{}", &head[..=i], link),
    }
}
