//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use reqwest::{Client, Request, Response};
use site_walker::config::{Config, CrawlerConfig};
use site_walker::crawler::{crawl, Coordinator, HttpClient};
use site_walker::{PageError, Termination, WalkerError};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler configuration tuned for fast tests
fn create_test_config() -> CrawlerConfig {
    CrawlerConfig {
        workers: 4,
        rate_limit_interval_ms: 1,
        frontier_capacity: 100,
        results_capacity: 10,
        run_timeout_secs: 10,
    }
}

/// Serves an HTML page at `route`, expecting exactly `calls` requests
async fn mount_html(server: &MockServer, route: &str, body: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .expect(calls)
        .mount(server)
        .await;
}

fn page_url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
}

/// HTTP client that remembers every URL it was asked for
#[derive(Clone, Default)]
struct RecordingClient {
    inner: Client,
    requested: Arc<Mutex<Vec<Url>>>,
}

impl RecordingClient {
    fn requested(&self) -> Vec<Url> {
        self.requested.lock().unwrap().clone()
    }
}

impl HttpClient for RecordingClient {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, reqwest::Error>> + Send {
        self.requested.lock().unwrap().push(request.url().clone());
        self.inner.execute(request)
    }
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="https://external.com/page">External</a>
        </body></html>"#,
        1,
    )
    .await;
    mount_html(&server, "/page1", r#"<a href="/page2">Page 2</a>"#, 1).await;
    mount_html(&server, "/page2", r#"<a href="/">Home</a>"#, 1).await;

    let client = RecordingClient::default();
    let root = page_url(&server, "/");
    let coordinator =
        Coordinator::new(root.as_str(), client.clone(), create_test_config()).unwrap();

    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.len(), 3);

    let root_page = report.page(&root).expect("root not recorded");
    assert_eq!(root_page.links().len(), 3);
    assert!(root_page
        .links()
        .iter()
        .any(|link| link.as_str() == "https://external.com/page"));

    let page1 = report.page(&page_url(&server, "/page1")).unwrap();
    assert_eq!(page1.links(), &[page_url(&server, "/page2")]);

    let page2 = report.page(&page_url(&server, "/page2")).unwrap();
    assert_eq!(page2.links(), &[root.clone()]);

    let requested = client.requested();
    assert_eq!(requested.len(), 3);
    assert!(requested
        .iter()
        .all(|url| url.host_str() != Some("external.com")));

    assert_eq!(report.stats.pages_recorded, 3);
    assert_eq!(report.stats.pages_failed, 0);
    assert_eq!(report.stats.links_enqueued, 2);
    assert!(report.stats.finished_at.is_some());

    server.verify().await;
}

#[tokio::test]
async fn test_non_html_page_not_recorded() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r#"<a href="/data">Data</a><a href="/page1">Page 1</a>"#,
        1,
    )
    .await;
    mount_html(&server, "/page1", "<p>No links</p>", 1).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"links": ["<a href=\"/hidden\">"]}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/hidden", "", 0).await;

    let coordinator = Coordinator::new(
        page_url(&server, "/").as_str(),
        Client::new(),
        create_test_config(),
    )
    .unwrap();
    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.len(), 2);
    assert!(report.page(&page_url(&server, "/data")).is_none());
    assert_eq!(report.stats.pages_failed, 1);
    assert_eq!(
        report.stats.errors_by_kind.get("unsupported_media_type"),
        Some(&1)
    );

    server.verify().await;
}

#[tokio::test]
async fn test_missing_content_type_is_skipped() {
    let server = MockServer::start().await;

    mount_html(&server, "/", r#"<a href="/bare">Bare</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(
        page_url(&server, "/").as_str(),
        Client::new(),
        create_test_config(),
    )
    .unwrap();
    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.len(), 1);
    assert_eq!(report.stats.errors_by_kind.get("parse"), Some(&1));
}

#[tokio::test]
async fn test_malformed_href_is_skipped() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r#"<a href="https://example.com/first">Valid</a>
           <a href="https://exa mple.com/broken">Broken</a>"#,
        1,
    )
    .await;

    let coordinator = Coordinator::new(
        page_url(&server, "/").as_str(),
        Client::new(),
        create_test_config(),
    )
    .unwrap();
    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.len(), 1);
    let root = report.page(&page_url(&server, "/")).unwrap();
    assert!(root.is_success());
    assert_eq!(root.links().len(), 1);
    assert_eq!(root.links()[0].as_str(), "https://example.com/first");
}

#[tokio::test]
async fn test_query_and_fragment_variants_fetched_once() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r##"<a href="/a?x=1">A</a>
            <a href="/a#section">A again</a>
            <a href="/a/">A with slash</a>
            <a href="/a">Plain A</a>
            <a href="/?page=2">Root again</a>"##,
        1,
    )
    .await;
    mount_html(&server, "/a", r#"<a href="/a?y=2">Self</a>"#, 1).await;
    mount_html(&server, "/a/", "", 0).await;

    let coordinator = Coordinator::new(
        page_url(&server, "/").as_str(),
        Client::new(),
        create_test_config(),
    )
    .unwrap();
    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.len(), 2);

    // The first variant in document order is the one fetched
    let page_a = report.page(&page_url(&server, "/a")).unwrap();
    assert_eq!(page_a.url().query(), Some("x=1"));

    server.verify().await;
}

#[tokio::test]
async fn test_full_frontier_drops_links() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
        1,
    )
    .await;
    mount_html(&server, "/a", "", 1).await;
    mount_html(&server, "/b", "", 0).await;
    mount_html(&server, "/c", "", 0).await;

    let config = CrawlerConfig {
        workers: 1,
        frontier_capacity: 1,
        ..create_test_config()
    };
    let coordinator =
        Coordinator::new(page_url(&server, "/").as_str(), Client::new(), config).unwrap();
    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.len(), 2);
    assert_eq!(report.stats.links_enqueued, 1);
    assert_eq!(report.stats.links_dropped, 2);

    server.verify().await;
}

#[tokio::test]
async fn test_cancellation_keeps_partial_results() {
    let server = MockServer::start().await;

    mount_html(&server, "/", r#"<a href="/slow">Slow</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(
        page_url(&server, "/").as_str(),
        Client::new(),
        create_test_config(),
    )
    .unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let report = coordinator.run(cancel).await;

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(report.termination, Termination::Cancelled);
    assert_eq!(report.len(), 1);
    assert!(report.page(&page_url(&server, "/")).is_some());
    assert!(report.page(&page_url(&server, "/slow")).is_none());
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let server = MockServer::start().await;

    mount_html(&server, "/", r#"<a href="/slow">Slow</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        run_timeout_secs: 1,
        ..create_test_config()
    };
    let coordinator =
        Coordinator::new(page_url(&server, "/").as_str(), Client::new(), config).unwrap();

    let start = Instant::now();
    let report = coordinator.run(CancellationToken::new()).await;

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(report.termination, Termination::DeadlineExceeded);
    assert_eq!(report.len(), 1);
}

#[tokio::test]
async fn test_invalid_seed_fails_before_fetching() {
    let client = RecordingClient::default();

    let result = Coordinator::new("not a url", client.clone(), create_test_config());
    assert!(matches!(result, Err(WalkerError::Url(_))));

    let result = crawl("/relative", &Config::default(), CancellationToken::new()).await;
    assert!(matches!(result, Err(WalkerError::Url(_))));

    assert!(client.requested().is_empty());
}

#[tokio::test]
async fn test_unreachable_root_completes_empty() {
    // Bind and release a port so nothing listens on it
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let coordinator = Coordinator::new(
        &format!("http://{}/", addr),
        Client::new(),
        create_test_config(),
    )
    .unwrap();
    let report = coordinator.run(CancellationToken::new()).await;

    assert_eq!(report.termination, Termination::Completed);
    assert!(report.is_empty());
    assert_eq!(report.stats.errors_by_kind.get("fetch"), Some(&1));
}

#[tokio::test]
async fn test_crawl_entry_point_with_config() {
    let server = MockServer::start().await;

    mount_html(&server, "/", r#"<a href="/about">About</a>"#, 1).await;
    mount_html(&server, "/about", r#"<a href="mailto:team@example.com">Mail</a>"#, 1).await;

    let config = Config {
        crawler: create_test_config(),
        ..Config::default()
    };
    let report = crawl(&page_url(&server, "/").to_string(), &config, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.len(), 2);

    let about = report.page(&page_url(&server, "/about")).unwrap();
    assert_eq!(about.links()[0].scheme(), "mailto");
    assert!(!about
        .links()
        .iter()
        .any(|link| matches!(link.scheme(), "http" | "https")));

    server.verify().await;
}

#[test]
fn test_page_error_messages() {
    assert_eq!(
        PageError::UnsupportedMediaType("application/json".into()).to_string(),
        "unexpected content type: application/json"
    );
    assert_eq!(PageError::Cancelled.to_string(), "crawl cancelled");
}
