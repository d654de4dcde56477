//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_trawl::config::Config;
use link_trawl::crawler::{
    crawl, BoundedFetcher, Coordinator, ExternalRef, FetchStatus, HtmlLinkExtractor, ResultRow,
};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.max_concurrency = 5;
    config.crawler.request_timeout = 5;
    config.crawler.connect_timeout = 2;
    config
}

async fn mount(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_internal_and_external_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(
        &mock_server,
        "/",
        html(r#"<a href="/a">A</a> <a href="https://other.com/">B</a>"#),
    )
    .await;
    mount(&mock_server, "/a", html("Page A")).await;

    let seed = format!("{}/", base_url);
    let report = crawl(&seed, &test_config()).await.expect("Crawl failed");

    assert_eq!(
        report.external,
        vec![ExternalRef {
            url: "https://other.com/".to_string(),
            text: "B".to_string(),
        }]
    );
    assert!(report.results.contains(&ResultRow {
        parent: Some(seed.clone()),
        url: format!("{}/a", base_url),
        status: FetchStatus::Http(200),
        text: "A".to_string(),
    }));
    assert!(report.failed.is_empty());
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.rounds, 2);

    // The external link is recorded but never requested
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(report
        .statuses
        .iter()
        .all(|record| !record.url.contains("other.com")));
}

#[tokio::test]
async fn test_timeout_recorded_as_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(&mock_server, "/", html(r#"<a href="/dead">Dead end</a>"#)).await;
    mount(
        &mock_server,
        "/dead",
        html("too late").set_delay(Duration::from_secs(3)),
    )
    .await;

    let mut config = test_config();
    config.crawler.request_timeout = 1;
    config.crawler.connect_timeout = 1;

    let report = crawl(&format!("{}/", base_url), &config)
        .await
        .expect("Crawl failed");

    let dead = format!("{}/dead", base_url);
    assert!(report
        .failed
        .iter()
        .any(|row| row.url == dead && row.text == "Dead end"));
    assert!(report
        .statuses
        .iter()
        .any(|record| record.url == dead && record.status == FetchStatus::Unreachable));
    assert!(report.results.iter().all(|row| row.url != dead));
}

#[tokio::test]
async fn test_http_errors_are_failures_with_parent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(
        &mock_server,
        "/",
        html(r#"<a href="/missing">Missing</a><a href="/broken">Broken</a>"#),
    )
    .await;
    mount(&mock_server, "/missing", ResponseTemplate::new(404)).await;
    mount(
        &mock_server,
        "/broken",
        ResponseTemplate::new(500).set_body_string("oops"),
    )
    .await;

    let seed = format!("{}/", base_url);
    let report = crawl(&seed, &test_config()).await.expect("Crawl failed");

    assert_eq!(report.broken_count(), 2);
    for row in &report.failed {
        assert_eq!(row.parent.as_deref(), Some(seed.as_str()));
    }
    assert!(report.statuses.iter().any(|record| record.status == FetchStatus::Http(404)));
    assert!(report.statuses.iter().any(|record| record.status == FetchStatus::Http(500)));
}

#[tokio::test]
async fn test_self_link_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(&mock_server, "/", html(r#"<a href="/">Home</a>"#)).await;

    let report = crawl(&format!("{}/", base_url), &test_config())
        .await
        .expect("Crawl failed");

    // `rounds` counts fetch rounds; the seed is normalized to `/`, so the
    // self-link is already seen after the first one
    assert_eq!(report.rounds, 1);
    assert_eq!(report.pages_fetched, 1);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_each_page_fetched_once_across_rounds() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // A small cycle: / -> /a -> /b -> / and /a
    mount(&mock_server, "/", html(r#"<a href="/a">A</a>"#)).await;
    mount(&mock_server, "/a", html(r#"<a href="/b">B</a><a href="/">Home</a>"#)).await;
    mount(&mock_server, "/b", html(r#"<a href="/a">A</a><a href="/">Home</a>"#)).await;

    let report = crawl(&format!("{}/", base_url), &test_config())
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.rounds, 3);

    let requests = mock_server.received_requests().await.unwrap();
    let paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths.len(), 3, "unexpected requests: {:?}", paths);
}

#[tokio::test]
async fn test_emails_and_javascript() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(
        &mock_server,
        "/",
        html(
            r#"<a href="mailto:x@y.com">Mail</a>
               <a href="x@y.com">Bare</a>
               <a href="JavaScript:void(0)">Click</a>"#,
        ),
    )
    .await;

    let seed = format!("{}/", base_url);
    let report = crawl(&seed, &test_config()).await.expect("Crawl failed");

    let hrefs: Vec<_> = report.emails.iter().map(|e| e.href.as_str()).collect();
    assert_eq!(hrefs, vec!["mailto:x@y.com", "x@y.com"]);
    assert!(report.emails.iter().all(|e| e.page_url == seed));
    assert!(report.external.is_empty());
    assert_eq!(report.rounds, 1);
}

#[tokio::test]
async fn test_moved_permanently_body_is_parsed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(
        &mock_server,
        "/",
        ResponseTemplate::new(301)
            .insert_header("location", "/elsewhere")
            .set_body_string(r#"<a href="/from-redirect">Next</a>"#),
    )
    .await;
    mount(&mock_server, "/from-redirect", html("done")).await;

    let report = crawl(&format!("{}/", base_url), &test_config())
        .await
        .expect("Crawl failed");

    // Only the 301 body is followed, not its Location header
    let fetched: HashSet<_> = report.statuses.iter().map(|r| r.url.clone()).collect();
    assert!(fetched.contains(&format!("{}/from-redirect", base_url)));
    assert!(!fetched.contains(&format!("{}/elsewhere", base_url)));
    assert!(report
        .results
        .iter()
        .any(|row| row.status == FetchStatus::Http(301)));
}

#[tokio::test]
async fn test_failed_url_refetched_when_rediscovered() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(&mock_server, "/", html(r#"<a href="/dead">x</a><a href="/next">n</a>"#)).await;
    mount(&mock_server, "/next", html(r#"<a href="/dead">x</a>"#)).await;
    mount(&mock_server, "/dead", ResponseTemplate::new(404)).await;

    let report = crawl(&format!("{}/", base_url), &test_config())
        .await
        .expect("Crawl failed");

    let requests = mock_server.received_requests().await.unwrap();
    let dead_hits = requests.iter().filter(|r| r.url.path() == "/dead").count();
    assert_eq!(dead_hits, 2);

    // Same (url, text) both times, so the failure set holds it once
    assert_eq!(report.broken_count(), 1);
    assert!(report.failed.iter().all(|row| row.url.ends_with("/dead")));
}

#[tokio::test]
async fn test_outcome_sets_disjoint() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount(
        &mock_server,
        "/",
        html(r#"<a href="/ok">ok</a><a href="/gone">gone</a><a href="http://elsewhere.test/">ext</a>"#),
    )
    .await;
    mount(&mock_server, "/ok", html("fine")).await;
    mount(&mock_server, "/gone", ResponseTemplate::new(410)).await;

    let report = crawl(&format!("{}/", base_url), &test_config())
        .await
        .expect("Crawl failed");

    let fetched: HashSet<_> = report.results.iter().map(|r| r.url.as_str()).collect();
    let failed: HashSet<_> = report.failed.iter().map(|r| r.url.as_str()).collect();
    let external: HashSet<_> = report.external.iter().map(|r| r.url.as_str()).collect();

    assert!(fetched.is_disjoint(&failed));
    assert!(fetched.is_disjoint(&external));
    assert!(failed.is_disjoint(&external));
    assert_eq!(fetched.len(), 2);
    assert_eq!(failed.len(), 1);
    assert_eq!(external.len(), 1);
}

#[tokio::test]
async fn test_concurrency_cap_is_enforced() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..6)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount(&mock_server, "/", html(&links)).await;
    for i in 0..6 {
        mount(
            &mock_server,
            &format!("/p{}", i),
            html("slow").set_delay(Duration::from_millis(300)),
        )
        .await;
    }

    let mut config = test_config();
    config.crawler.max_concurrency = 2;
    let fetcher = BoundedFetcher::new(&config).unwrap();
    let seed = url::Url::parse(&format!("{}/", base_url)).unwrap();
    let extractor = HtmlLinkExtractor::new(seed.clone());
    let coordinator = Coordinator::with_parts(seed, fetcher, extractor).unwrap();

    let start = Instant::now();
    let report = coordinator.run().await;
    let elapsed = start.elapsed();

    assert_eq!(report.pages_fetched, 7);
    // Six 300ms pages, two at a time, take at least three waves
    assert!(
        elapsed >= Duration::from_millis(900),
        "finished too fast: {:?}",
        elapsed
    );
}
