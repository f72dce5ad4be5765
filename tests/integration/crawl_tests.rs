//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end over real HTTP.

use sitemap_scribe::config::Config;
use sitemap_scribe::crawler::Coordinator;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `sitemap` into `output_dir`
fn create_test_config(sitemap: String, output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.source.sitemaps = vec![sitemap];
    config.source.base_domain = "127.0.0.1".to_string();
    config.crawler.delay_secs = 0.0;
    config.crawler.auto_discover_sitemaps = false;
    config.crawler.request_timeout_ms = 2_000;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.directory = output_dir.path().to_string_lossy().to_string();
    config
}

fn urlset(locs: &[String]) -> String {
    let urls: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc><lastmod>2024-05-01</lastmod></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        urls
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_xml(server: &MockServer, xml_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(xml_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

fn read_json(dir: &TempDir, name: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.path().join(name)).expect("missing export");
    serde_json::from_str(&content).expect("invalid JSON export")
}

#[tokio::test]
async fn test_full_crawl_writes_corpus() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/", base_url)]),
    )
    .await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title>
        <meta name="description" content="Project documentation"></head><body>
        <nav class="sidebar"><a href="/docs/setup">Setup</a></nav>
        <main><h1 id="welcome">Welcome</h1><p>Read the <a href="/docs/intro">introduction</a>
        first. Questions go to <a href="https://forum.example.org/">the forum</a>.</p></main>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        &mock_server,
        "/docs/intro",
        r#"<html><head><title>Introduction</title></head><body><article>
        <h1>Introduction</h1><p>Install the tool first.</p>
        <h2 id="usage">Usage</h2><p>Run it from a terminal.</p>
        <pre><code class="language-bash">scribe --help</code></pre>
        </article></body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        &mock_server,
        "/docs/setup",
        r#"<html><head><title>Setup</title></head><body><main>
        <p>Configure the tool.</p></main></body></html>"#
            .to_string(),
    )
    .await;

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(format!("{}/sitemap.xml", base_url), &output_dir);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let corpus = coordinator.run().await.expect("Crawl failed");

    assert_eq!(corpus.pages.len(), 3);
    let stats = &corpus.metadata.statistics;
    assert_eq!(stats.total_visited, 3);
    assert_eq!(stats.total_failed, 0);
    assert_eq!(stats.navigation_links_found, 1);

    let intro_url = format!("{}/docs/intro", base_url);
    let intro = corpus
        .pages
        .iter()
        .find(|p| p.url == intro_url)
        .expect("intro page not crawled");
    assert_eq!(intro.depth, 1);
    assert_eq!(intro.parent_url.as_deref(), Some(base_url.as_str()));
    assert_eq!(intro.section_count, 2);
    assert_eq!(intro.code_languages, vec!["bash".to_string()]);

    let home = corpus
        .pages
        .iter()
        .find(|p| p.url == base_url)
        .expect("home page not crawled");
    assert_eq!(home.description, "Project documentation");
    assert_eq!(home.last_modified.as_deref(), Some("2024-05-01"));
    assert_eq!(home.links.external_count, 1);

    let setup = corpus
        .pages
        .iter()
        .find(|p| p.url.ends_with("/docs/setup"))
        .expect("navigation page not crawled");
    assert_eq!(setup.depth, 0);
    assert_eq!(setup.parent_url, None);

    assert!(output_dir.path().join("index.md").is_file());
    assert!(output_dir.path().join("docs-intro.md").is_file());
    assert!(output_dir.path().join("docs-setup.md").is_file());

    let crawled = read_json(&output_dir, "crawled_data.json");
    assert_eq!(crawled["metadata"]["total_pages"], 3);
    assert_eq!(crawled["metadata"]["base_domain"], "127.0.0.1");
    assert_eq!(crawled["pages"].as_array().map(Vec::len), Some(3));
    assert_eq!(crawled["link_graph"][&intro_url]["depth"], 1);
    assert_eq!(crawled["pages"][0]["lastmod"], "2024-05-01");

    let chunks = read_json(&output_dir, "vector_data.json");
    let chunks = chunks.as_array().expect("chunk export is a list");
    assert!(chunks.len() >= 3);
    assert!(chunks
        .iter()
        .any(|c| c["id"] == format!("{}#chunk-0", intro_url) && c["has_code"] == true));
}

#[tokio::test]
async fn test_timeout_counts_as_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/slow", base_url), format!("{}/fast", base_url)]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<main><p>Too late</p></main>")
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/fast",
        "<main><p>Quick answer</p></main>".to_string(),
    )
    .await;

    let output_dir = TempDir::new().unwrap();
    let mut config = create_test_config(format!("{}/sitemap.xml", base_url), &output_dir);
    config.crawler.request_timeout_ms = 200;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let corpus = coordinator.run().await.expect("Crawl failed");

    assert_eq!(corpus.metadata.statistics.total_failed, 1);
    assert_eq!(corpus.pages.len(), 1);
    assert!(corpus.pages[0].url.ends_with("/fast"));
    assert!(!output_dir.path().join("slow.md").exists());
}

#[tokio::test]
async fn test_malformed_sitemap_does_not_block_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        format!(
            r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sitemap><loc>{0}/broken.xml</loc></sitemap>
            <sitemap><loc>{0}/missing.xml</loc></sitemap>
            <sitemap><loc>{0}/good.xml</loc></sitemap>
            </sitemapindex>"#,
            base_url
        ),
    )
    .await;
    mount_xml(
        &mock_server,
        "/broken.xml",
        "<urlset><url><loc>oops</url>".to_string(),
    )
    .await;
    mount_xml(
        &mock_server,
        "/good.xml",
        urlset(&[format!("{}/page", base_url)]),
    )
    .await;
    mount_page(
        &mock_server,
        "/page",
        "<main><p>Still crawled</p></main>".to_string(),
    )
    .await;

    let output_dir = TempDir::new().unwrap();
    let config = create_test_config(format!("{}/sitemap_index.xml", base_url), &output_dir);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let corpus = coordinator.run().await.expect("Crawl failed");

    assert_eq!(corpus.pages.len(), 1);
    assert_eq!(corpus.pages[0].url, format!("{}/page", base_url));
    assert_eq!(corpus.metadata.statistics.total_failed, 0);
}

#[tokio::test]
async fn test_discovers_sitemap_from_robots_txt() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/", base_url)]),
    )
    .await;
    mount_page(
        &mock_server,
        "/robots.txt",
        format!("User-agent: *\nAllow: /\nSitemap: {}/extra-sitemap.xml\n", base_url),
    )
    .await;
    mount_xml(
        &mock_server,
        "/extra-sitemap.xml",
        urlset(&[format!("{}/hidden/", base_url)]),
    )
    .await;
    // Conventional locations other than the configured one answer 404
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/",
        "<main><h1>Home</h1><p>Nothing links to the hidden page.</p></main>".to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/hidden",
        "<main><h1>Hidden</h1><p>Only listed in a robots.txt sitemap.</p></main>".to_string(),
    )
    .await;

    let output_dir = TempDir::new().unwrap();
    let mut config = create_test_config(format!("{}/sitemap.xml", base_url), &output_dir);
    config.crawler.auto_discover_sitemaps = true;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let corpus = coordinator.run().await.expect("Crawl failed");

    assert_eq!(corpus.metadata.statistics.sitemaps_discovered, 1);

    let hidden = corpus
        .pages
        .iter()
        .find(|p| p.url == format!("{}/hidden", base_url))
        .expect("page from discovered sitemap not crawled");
    assert_eq!(hidden.depth, 0);
    assert_eq!(hidden.parent_url.as_deref(), Some(base_url.as_str()));
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/", base_url)]),
    )
    .await;
    mount_page(
        &mock_server,
        "/robots.txt",
        "User-agent: *\nDisallow: /admin\n".to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/",
        r#"<main><a href="/allowed">Allowed Page</a> <a href="/admin">Admin Page</a></main>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/allowed",
        "<main><p>Allowed content</p></main>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<main>secret</main>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let mut config = create_test_config(format!("{}/sitemap.xml", base_url), &output_dir);
    config.crawler.respect_robots_txt = true;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let corpus = coordinator.run().await.expect("Crawl failed");

    assert_eq!(corpus.pages.len(), 2);
    assert_eq!(corpus.metadata.statistics.total_skipped, 1);
    assert!(corpus.pages.iter().all(|p| !p.url.ends_with("/admin")));
}
