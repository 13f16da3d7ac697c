//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - The `HttpClient` seam the crawl core is written against
//! - Building a reqwest client from the `[http]` configuration
//! - GET requests that only accept HTML
//! - Content-Type checking and error classification

use crate::config::HttpConfig;
use crate::crawler::parser::extract_links;
use crate::state::PageError;
use mime::Mime;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, Method, Request, Response};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Anything that can turn a request into a response
///
/// Timeouts, TLS, redirects and connection reuse are the implementor's
/// business; the crawler only issues requests.
pub trait HttpClient: Send + Sync + 'static {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, reqwest::Error>> + Send;
}

impl HttpClient for Client {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, reqwest::Error>> + Send {
        Client::execute(self, request)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP transport configuration
///
/// # Example
///
/// ```no_run
/// use site_walker::config::HttpConfig;
/// use site_walker::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and extracts its links
///
/// # Request Flow
///
/// 1. Send one GET request with `Accept: text/html`
/// 2. Check the declared media type (parameters such as charset are ignored)
///    - Missing or malformed header → `PageError::Parse`
///    - Anything but `text/html` → `PageError::UnsupportedMediaType`
/// 3. Read the body and extract anchor links
///
/// The status code is not inspected: an HTML error page is parsed like any
/// other page.
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - Absolute URLs of every anchor, in document order
/// * `Err(PageError)` - The page could not be fetched or is not HTML
pub async fn fetch_links<C>(client: &C, page_url: &Url) -> Result<Vec<Url>, PageError>
where
    C: HttpClient + ?Sized,
{
    let body = fetch_html(client, page_url).await?;
    Ok(extract_links(&body, page_url))
}

/// Requests an HTML document and returns its body
pub async fn fetch_html<C>(client: &C, page_url: &Url) -> Result<String, PageError>
where
    C: HttpClient + ?Sized,
{
    let mut request = Request::new(Method::GET, page_url.clone());
    request
        .headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("text/html"));

    let response = client
        .execute(request)
        .await
        .map_err(|source| PageError::Fetch {
            url: page_url.to_string(),
            source,
        })?;

    tracing::debug!("Fetched {} ({})", page_url, response.status());

    let media_type = media_type(response.headers().get(CONTENT_TYPE))?;
    if media_type != "text/html" {
        return Err(PageError::UnsupportedMediaType(media_type));
    }

    response
        .text()
        .await
        .map_err(|e| PageError::Parse(format!("error parsing HTML: {}", e)))
}

/// Parses a Content-Type header down to its lowercase `type/subtype`
fn media_type(header: Option<&HeaderValue>) -> Result<String, PageError> {
    let value = header
        .ok_or_else(|| PageError::Parse("error parsing content type: no media type".to_string()))?
        .to_str()
        .map_err(|e| PageError::Parse(format!("error parsing content type: {}", e)))?;

    let mime: Mime = value
        .parse()
        .map_err(|e| PageError::Parse(format!("error parsing content type: {}", e)))?;

    Ok(mime.essence_str().to_ascii_lowercase())
}
