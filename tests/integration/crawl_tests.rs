//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch/extract/enqueue cycle end-to-end.

use site_crawler::config::{build_config, CrawlConfig, FetchPolicy, FileConfig, Overrides};
use site_crawler::crawler::{run_crawl, CrawlEvent, CrawlReport};
use site_crawler::output::CrawlSummary;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with fast retries
fn create_test_config(seed: &str, overrides: Overrides) -> CrawlConfig {
    let mut config = build_config(seed, FileConfig::default(), overrides)
        .expect("Failed to build config");
    config.fetch = FetchPolicy {
        timeout: Duration::from_secs(5),
        retry_delay: Duration::from_millis(10),
        ..FetchPolicy::default()
    };
    config
}

fn with_limit(limit: usize) -> Overrides {
    Overrides {
        limit: Some(limit),
        ..Overrides::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body).into_bytes(),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn requested_paths(report: &CrawlReport) -> Vec<String> {
    report
        .requests
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_same_host_links_are_followed() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="/a">A</a>
               <a href="{}/b">B</a>
               <a href="https://other.com/c">C</a>
               <a href="mailto:x@y.com">Mail</a>"#,
            base_url
        ),
    )
    .await;
    mount_page(&server, "/a", "A").await;
    mount_page(&server, "/b", "B").await;

    let config = create_test_config(&format!("{}/", base_url), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(requested_paths(&report), vec!["/", "/a", "/b"]);
    assert!(report.requests.iter().all(|r| r.status == Some(200)));
    assert!(report.requests.iter().all(|r| r.success && !r.failed));
    assert!(!report.limit_reached);

    // Discovered pages remember where they were found
    assert_eq!(report.requests[0].found_on, None);
    assert_eq!(
        report.requests[1].found_on.as_ref().map(|u| u.to_string()),
        Some(format!("{}/", base_url))
    );
}

#[tokio::test]
async fn test_limit_of_one_fetches_only_seed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(""))
        .expect(0)
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let config = create_test_config(&format!("{}/", server.uri()), with_limit(1));
    let report = run_crawl(config, Some(tx)).await.unwrap();

    assert_eq!(report.requests.len(), 1);
    assert!(report.limit_reached);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(events, vec![CrawlEvent::Request(report.requests[0].clone())]);
}

#[tokio::test]
async fn test_limit_is_never_exceeded() {
    let server = MockServer::start().await;

    // Every page links to ten new pages
    Mock::given(method("GET"))
        .respond_with(html(
            &(0..10)
                .map(|i| format!(r#"<a href="/page-{}">{}</a>"#, i, i))
                .collect::<String>(),
        ))
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", server.uri()), with_limit(5));
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.requests.len(), 5);
    assert!(report.limit_reached);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/a/deep">Deep</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/b/deep">Deep</a>"#).await;
    mount_page(&server, "/a/deep", "").await;
    mount_page(&server, "/b/deep", "").await;

    let config = create_test_config(&format!("{}/", server.uri()), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(
        requested_paths(&report),
        vec!["/", "/a", "/b", "/a/deep", "/b/deep"]
    );
}

#[tokio::test]
async fn test_duplicate_links_are_fetched_once() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r##"<a href="/a">1</a><a href="/a">2</a><a href="{}/a#top">3</a><a href="/">home</a>"##,
            base_url
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/">home</a><a href="/a">self</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", base_url), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(requested_paths(&report), vec!["/", "/a"]);
}

#[tokio::test]
async fn test_excluded_paths_are_not_crawled() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/blog/post-1">Blog</a><a href="/news/post-1">News</a>"#,
    )
    .await;
    mount_page(&server, "/news/post-1", "").await;
    Mock::given(method("GET"))
        .and(path("/blog/post-1"))
        .respond_with(html(""))
        .expect(0)
        .mount(&server)
        .await;

    let overrides = Overrides {
        exclude: Some("/blog".to_string()),
        ..Overrides::default()
    };
    let config = create_test_config(&format!("{}/", server.uri()), overrides);
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(requested_paths(&report), vec!["/", "/news/post-1"]);
}

async fn mount_redirect_chain(server: &MockServer, prefix: &str, hops: usize) {
    for hop in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/{}{}", prefix, hop)))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/{}{}", server.uri(), prefix, hop + 1).as_str()),
            )
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_too_many_redirects() {
    let server = MockServer::start().await;

    mount_redirect_chain(&server, "r", 4).await;
    mount_page(&server, "/r4", r#"<a href="/never">Never</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/never"))
        .respond_with(html(""))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/r0", server.uri()), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.requests.len(), 1);
    let stats = &report.requests[0];
    assert_eq!(stats.url.path(), "/r0");
    assert_eq!(stats.status, None);
    assert!(stats.failed);
    assert!(!stats.success);
    assert_eq!(stats.elapsed_seconds, None);
    assert!(stats.error_message.is_some());
}

#[tokio::test]
async fn test_redirects_within_limit_are_followed() {
    let server = MockServer::start().await;

    mount_redirect_chain(&server, "s", 3).await;
    mount_page(&server, "/s3", r#"<a href="/after">After</a>"#).await;
    mount_page(&server, "/after", "").await;

    let config = create_test_config(&format!("{}/s0", server.uri()), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(requested_paths(&report), vec!["/s0", "/after"]);
    assert_eq!(report.requests[0].status, Some(200));
}

#[tokio::test]
async fn test_identification_header_and_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("x-webhub", "webhub-site-crawler"))
        .and(header("authorization", "Basic dXNlcjpwYTpzcw=="))
        .respond_with(html(""))
        .expect(1)
        .mount(&server)
        .await;

    let overrides = Overrides {
        basic_auth: Some("user:pa:ss".to_string()),
        ..Overrides::default()
    };
    let config = create_test_config(&format!("{}/", server.uri()), overrides);
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.requests[0].status, Some(200));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_page(&server, "/", "").await;

    let config = create_test_config(&format!("{}/", server.uri()), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.requests.len(), 1);
    assert_eq!(report.requests[0].status, Some(200));
    assert!(report.requests[0].success);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_persistent_server_error_is_recorded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", server.uri()), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    let stats = &report.requests[0];
    assert_eq!(stats.status, Some(500));
    assert!(stats.failed);
    assert!(stats.elapsed_seconds.is_some());
}

/// Serves a response that promises more body than it sends, then closes the connection
async fn spawn_truncating_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&connections);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\n\
                      Content-Type: text/html\r\n\
                      Content-Length: 1000\r\n\
                      Connection: close\r\n\r\n\
                      <html><a",
                )
                .await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}/", addr), connections)
}

#[tokio::test]
async fn test_truncated_body_is_retried_and_recorded() {
    let (seed, connections) = spawn_truncating_server().await;
    let config = create_test_config(&seed, Overrides::default());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let report = run_crawl(config, Some(tx)).await.unwrap();

    assert_eq!(connections.load(Ordering::SeqCst), 3);
    assert_eq!(report.requests.len(), 1);
    let stats = &report.requests[0];
    assert_eq!(stats.status, None);
    assert!(stats.failed);
    assert!(stats.elapsed_seconds.is_some());
    assert!(stats.error_message.is_some());

    match rx.recv().await {
        Some(CrawlEvent::Request(event)) => assert_eq!(&event, stats),
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_client_errors_are_recorded_not_retried() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/missing">Missing</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"<a href="/hidden">x</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html(""))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", server.uri()), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(requested_paths(&report), vec!["/", "/missing"]);
    let missing = &report.requests[1];
    assert_eq!(missing.status, Some(404));
    assert!(missing.failed);
    assert!(!missing.success);

    let summary = CrawlSummary::from_report(&report);
    assert_eq!(summary.total_requests, 2);
    assert_eq!(summary.successful_requests, 1);
    assert_eq!(summary.failed_requests, 1);
    assert_eq!(summary.failed[0].url.path(), "/missing");
}

#[tokio::test]
async fn test_legacy_charset_links() {
    let server = MockServer::start().await;

    // "/caf\u{e9}?q=\u{e9}" in ISO-8859-1
    let body = b"<html><body><a href=\"/caf\xe9?q=\xe9\">Caf\xe9</a></body></html>".to_vec();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=ISO-8859-1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/caf%C3%A9"))
        .respond_with(html(""))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{}/", server.uri()), Overrides::default());
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.requests.len(), 2);
    assert_eq!(report.requests[1].url.path(), "/caf%C3%A9");
    assert_eq!(report.requests[1].url.query(), Some("q=%E9"));
    assert_eq!(report.requests[1].status, Some(200));
}
