use url::Url;

/// Extracts the hostname from a URL, without port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_walker::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com"));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_host(&url), None);
/// ```
pub fn extract_host(url: &Url) -> Option<&str> {
    url.host_str()
}

/// Returns true if `link` is on the same host as `root`
///
/// Only the hostname is compared: scheme and port may differ. URLs without a
/// host never match.
pub fn is_same_host(root: &Url, link: &Url) -> bool {
    match (extract_host(root), extract_host(link)) {
        (Some(root_host), Some(link_host)) => root_host == link_host,
        _ => false,
    }
}
