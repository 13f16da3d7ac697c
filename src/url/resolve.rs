use crate::{UrlError, UrlResult};
use url::Url;

/// Parses an absolute URL, as used for the crawl root
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL, guaranteed to have a host
/// * `Err(UrlError)` - The string is not an absolute URL or has no host
///
/// # Examples
///
/// ```
/// use site_walker::url::parse_absolute;
///
/// assert!(parse_absolute("https://example.com/").is_ok());
/// assert!(parse_absolute("/relative/path").is_err());
/// assert!(parse_absolute("mailto:someone@example.com").is_err());
/// ```
pub fn parse_absolute(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|source| UrlError::Parse {
        url: url_str.to_string(),
        source,
    })?;

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(url_str.to_string()));
    }

    Ok(url)
}

/// Resolves a (possibly relative) reference against a base URL
///
/// Follows standard base-URI resolution: scheme and authority are inherited
/// from the base when missing, relative paths are merged with the base path,
/// and dot segments are removed. Absolute references are returned as parsed.
///
/// # Arguments
///
/// * `base` - The URL of the document containing the reference
/// * `reference` - The raw reference string, e.g. an `href` value
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(url::ParseError)` - The reference is malformed
pub fn resolve_reference(base: &Url, reference: &str) -> Result<Url, url::ParseError> {
    base.join(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/guide/index.html").unwrap()
    }

    fn resolve(reference: &str) -> String {
        resolve_reference(&base(), reference).unwrap().to_string()
    }

    #[test]
    fn test_absolute_reference_unchanged() {
        assert_eq!(
            resolve("https://another-domain.com/second"),
            "https://another-domain.com/second"
        );
    }

    #[test]
    fn test_root_relative_reference() {
        assert_eq!(resolve("/relative"), "https://example.com/relative");
    }

    #[test]
    fn test_path_relative_reference_merges() {
        assert_eq!(resolve("intro.html"), "https://example.com/docs/guide/intro.html");
    }

    #[test]
    fn test_dot_segments_removed() {
        assert_eq!(resolve("../api/./list"), "https://example.com/docs/api/list");
        assert_eq!(resolve("../../../../top"), "https://example.com/top");
    }

    #[test]
    fn test_scheme_relative_inherits_scheme() {
        assert_eq!(resolve("//cdn.example.com/lib"), "https://cdn.example.com/lib");
    }

    #[test]
    fn test_query_and_fragment_only() {
        assert_eq!(
            resolve("?page=2"),
            "https://example.com/docs/guide/index.html?page=2"
        );
        assert_eq!(
            resolve("#top"),
            "https://example.com/docs/guide/index.html#top"
        );
    }

    #[test]
    fn test_non_http_scheme_kept() {
        assert_eq!(resolve("mailto:a@example.com"), "mailto:a@example.com");
    }

    #[test]
    fn test_malformed_reference_rejected() {
        assert!(resolve_reference(&base(), "https://exa mple.com/").is_err());
        assert!(resolve_reference(&base(), "http://[::1").is_err());
        assert!(resolve_reference(&base(), "https://example.com:99999/").is_err());
    }

    #[test]
    fn test_parse_absolute() {
        assert!(parse_absolute("https://example.com/").is_ok());
        assert!(matches!(
            parse_absolute("not a url"),
            Err(UrlError::Parse { .. })
        ));
        assert!(matches!(
            parse_absolute("data:text/plain,hello"),
            Err(UrlError::MissingHost(_))
        ));
    }
}
