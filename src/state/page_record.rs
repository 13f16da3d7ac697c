/// Page records: the outcome of fetching one frontier URL
use crate::url::{canonicalize, CanonicalKey};
use thiserror::Error;
use url::Url;

/// Why a single page produced no links
///
/// None of these abort a crawl. A failed page is simply absent from the
/// recorded output and contributes nothing to the frontier.
#[derive(Debug, Error)]
pub enum PageError {
    /// The response declared a media type other than `text/html`
    #[error("unexpected content type: {0}")]
    UnsupportedMediaType(String),

    /// Transport failure: connection, timeout, or a non-HTTP response
    #[error("error fetching URL {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Malformed `Content-Type` header or unreadable body
    #[error("{0}")]
    Parse(String),

    /// The run was cancelled before the page could be fetched
    #[error("crawl cancelled")]
    Cancelled,
}

impl PageError {
    /// Short, stable name of the error kind, used for statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedMediaType(_) => "unsupported_media_type",
            Self::Fetch { .. } => "fetch",
            Self::Parse(_) => "parse",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Outcome of fetching one URL
///
/// Workers create one record per URL they dequeue and hand it to the
/// coordinator, which owns it from then on. Either `links` is filled and
/// `error` is `None`, or `error` is set and `links` is empty. Records are
/// read-only once created.
#[derive(Debug)]
pub struct PageRecord {
    url: Url,
    links: Vec<Url>,
    error: Option<PageError>,
}

impl PageRecord {
    pub fn success(url: Url, links: Vec<Url>) -> Self {
        Self {
            url,
            links,
            error: None,
        }
    }

    pub fn failure(url: Url, error: PageError) -> Self {
        Self {
            url,
            links: Vec::new(),
            error: Some(error),
        }
    }

    /// The URL that was fetched, exactly as it was enqueued
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Absolute URLs of every anchor on the page, in document order
    pub fn links(&self) -> &[Url] {
        &self.links
    }

    /// Set when the page could not be fetched or parsed
    pub fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    /// Returns true if the page was fetched and parsed
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Canonical key of the page URL
    pub fn key(&self) -> CanonicalKey {
        canonicalize(&self.url)
    }
}
