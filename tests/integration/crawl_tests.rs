//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl and ranking cycle end-to-end over real TCP connections.

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use webrank::config::{load_config, Config};
use webrank::crawler::{crawl, Coordinator};
use webrank::output::{format_markdown_report, write_markdown_report, RankingSummary};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration seeded at the root of the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::with_seed(format!("{}/", server.uri()));
    config.crawler.workers = 4;
    config.crawler.timeout_secs = 5;
    config.filter.hosts = vec!["127.0.0.1".to_string()];
    config
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// index links to page1, page2 and an outside host; page1 links back
async fn mount_small_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <a href="/page1">Page 1</a>
        <a href="page2">Page 2</a>
        <a href="http://other.example/x">Elsewhere</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        server,
        "/page1",
        r#"<html><body><a href="/">Home</a></body></html>"#,
    )
    .await;
    mount_page(server, "/page2", "<html><body>Content 2</body></html>").await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;
    let base_url = mock_server.uri();

    let report = crawl(create_test_config(&mock_server))
        .await
        .expect("Crawl failed");

    let graph = &report.graph;
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.id_of(&format!("{}/", base_url)), Some(0));
    let page1 = graph
        .id_of(&format!("{}/page1", base_url))
        .expect("page1 should be in the graph");
    let page2 = graph
        .id_of(&format!("{}/page2", base_url))
        .expect("page2 should be in the graph");
    assert!(!graph.contains("http://other.example/x"));

    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.inbound(0), &[page1]);
    assert!(graph.is_dangling(page2));

    assert_eq!(report.stats.pages_fetched, 3);
    assert_eq!(report.stats.pages_failed, 0);
    assert_eq!(report.stats.links_skipped, 1);

    assert!(report.outcome.converged);
    let sum: f64 = report.outcome.ranks.iter().sum();
    assert!((sum - 1.0).abs() < 1e-9);
    assert_eq!(report.outcome.top(10).len(), 3);
}

#[tokio::test]
async fn test_crawl_records_failed_pages() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/exists">ok</a><a href="/missing">broken</a>"#,
    )
    .await;
    mount_page(&mock_server, "/exists", "<p>leaf</p>").await;

    let report = crawl(create_test_config(&mock_server))
        .await
        .expect("Crawl failed");

    // the broken link is still a node, it just has no out-links
    assert_eq!(report.graph.len(), 3);
    assert_eq!(report.stats.pages_fetched, 2);
    assert_eq!(report.stats.pages_failed, 1);
}

#[tokio::test]
async fn test_crawl_respects_max_depth() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/d1">one</a>"#).await;
    mount_page(&mock_server, "/d1", r#"<a href="/d2">two</a>"#).await;
    mount_page(&mock_server, "/d2", r#"<a href="/d3">three</a>"#).await;

    let mut config = create_test_config(&mock_server);
    config.crawler.max_depth = 2;

    let report = Coordinator::from_config(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(report.graph.len(), 3);
    assert!(!report.graph.contains(&format!("{}/d3", mock_server.uri())));
    assert_eq!(report.stats.pages_fetched, 3);
}

#[tokio::test]
async fn test_url_pattern_filter() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/index.html",
        r#"<a href="a.html">a</a><a href="logo.png">img</a><a href="b.htm">b</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a.html", "a").await;
    mount_page(&mock_server, "/b.htm", "b").await;

    let mut config = create_test_config(&mock_server);
    config.crawler.seed_url = format!("{}/index.html", mock_server.uri());
    config.filter.pattern = Some(r"\.(htm|html)$".to_string());

    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.graph.len(), 3);
    assert!(!report
        .graph
        .contains(&format!("{}/logo.png", mock_server.uri())));
}

#[tokio::test]
async fn test_other_scheme_links_not_crawled() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/dir/index.html",
        r#"<a href="https://other.org/secure.html">tls</a>
        <a href="ftp://files.org/x">ftp</a>
        <a href="page.html">page</a>"#,
    )
    .await;
    mount_page(&mock_server, "/dir/page.html", "leaf").await;

    let mut config = create_test_config(&mock_server);
    config.crawler.seed_url = format!("{}/dir/index.html", mock_server.uri());

    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.graph.len(), 2);
    assert!(report
        .graph
        .contains(&format!("{}/dir/page.html", mock_server.uri())));
    assert!(report.graph.nodes().all(|(_, url)| !url.contains("other.org")));
    assert_eq!(report.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_crawl_from_config_file_and_report() {
    let mock_server = MockServer::start().await;
    mount_small_site(&mock_server).await;

    let toml = format!(
        r#"
[crawler]
seed-url = "{}/"
workers = 2
timeout-secs = 5

[filter]
hosts = ["127.0.0.1"]

[rank]
top-n = 2
"#,
        mock_server.uri()
    );
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    file.flush().unwrap();

    let config = load_config(file.path()).expect("Failed to load config");
    let top_n = config.rank.top_n;
    let report = crawl(config).await.expect("Crawl failed");

    let summary = RankingSummary::from_report(&report, top_n, None);
    assert_eq!(summary.pages.len(), 2);
    assert!(summary.pages[0].score >= summary.pages[1].score);

    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("rank.md");
    write_markdown_report(&summary, &report_path).expect("Failed to write report");

    let written = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(written, format_markdown_report(&summary));
    assert!(written.contains(&mock_server.uri()));
}
