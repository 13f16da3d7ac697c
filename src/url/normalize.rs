use std::fmt;
use url::Url;

/// Normalized string form of a URL used to decide whether two URLs name the
/// same page
///
/// Keys ignore the query and fragment, and treat `/page` and `/page/` alike.
/// Pages that differ only by query string (paginated listings, for example)
/// therefore collapse onto a single key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reduces a URL to its canonical key
///
/// # Normalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Remove query string
/// 3. Normalize path:
///    - Collapse repeated slashes
///    - Remove dot segments (. and ..)
///    - End with exactly one trailing slash (empty path becomes /)
///
/// Scheme, host and port are kept as the URL parser already normalized them
/// (lowercase host, default port elided). The function never fails and
/// applying it to its own output yields the same key.
///
/// # Examples
///
/// ```
/// use site_walker::url::canonicalize;
/// use url::Url;
///
/// let a = canonicalize(&Url::parse("https://example.com/page?a=1#top").unwrap());
/// let b = canonicalize(&Url::parse("https://example.com/page/").unwrap());
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "https://example.com/page/");
/// ```
pub fn canonicalize(url: &Url) -> CanonicalKey {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped.set_query(None);

    // Opaque URLs (mailto:, data:) have no hierarchical path to normalize
    if !stripped.cannot_be_a_base() {
        let path = normalize_path(stripped.path());
        stripped.set_path(&path);
    }

    CanonicalKey(stripped.into())
}

/// Normalizes a URL path to a root-anchored form with one trailing slash
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}/", segments.join("/"))
}
