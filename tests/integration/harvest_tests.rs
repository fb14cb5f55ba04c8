//! Integration tests for the harvester
//!
//! These tests use wiremock to serve sitemaps and run the full
//! input -> fetch -> parse -> CSV cycle end-to-end.

use sitemap_harvest::config::Config;
use sitemap_harvest::crawler::{
    FetchFailure, Harvester, HttpClient, HttpResponse, SitemapFetcher, SitemapParser,
};
use sitemap_harvest::output::CsvWriter;
use sitemap_harvest::source::UrlSource;
use sitemap_harvest::store::RecordStore;
use sitemap_harvest::{HarvestError, InputError};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

fn sitemap_body(locations: &[String]) -> String {
    let urls: String = locations
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="{}">{}</urlset>"#,
        NS, urls
    )
}

async fn mount_sitemap(server: &MockServer, sitemap_path: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(sitemap_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Creates a test configuration reading `base_urls.csv` from `dir`
fn create_test_config(dir: &Path, base_urls: &[String]) -> Config {
    let input = dir.join("base_urls.csv");
    let mut content = String::from("url\n");
    for url in base_urls {
        content.push_str(url);
        content.push('\n');
    }
    std::fs::write(&input, content).expect("Failed to write input");

    let mut config = Config::default();
    config.input.path = input.display().to_string();
    config.output.path = dir.join("sites.csv").display().to_string();
    config
}

fn read_output(config: &Config) -> String {
    std::fs::read_to_string(&config.output.path).expect("Failed to read output")
}

#[tokio::test]
async fn test_single_site_end_to_end() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let location = format!("{}/x", base_url);
    mount_sitemap(&server, "/sitemap.xml", 200, sitemap_body(&[location.clone()])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[base_url.clone()]);

    let mut harvester = Harvester::from_config(&config).expect("Failed to build harvester");
    let stats = harvester.run().await.expect("Harvest failed");

    assert_eq!(stats.sites_processed, 1);
    assert_eq!(stats.locations, 1);
    assert_eq!(
        read_output(&config),
        format!("site,url\n{},{}\n", base_url, location)
    );
}

#[tokio::test]
async fn test_not_found_site_is_skipped() {
    let server = MockServer::start().await;
    let missing = format!("{}/missing", server.uri());
    let present = format!("{}/present", server.uri());
    let locations = vec![
        format!("{}/page/3", present),
        format!("{}/page/1", present),
        format!("{}/page/2", present),
    ];

    mount_sitemap(&server, "/missing/sitemap.xml", 404, "Not Found".to_string()).await;
    mount_sitemap(&server, "/present/sitemap.xml", 200, sitemap_body(&locations)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[missing.clone(), present.clone()]);

    let mut harvester = Harvester::from_config(&config).unwrap();
    let stats = harvester.run().await.unwrap();

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.flushes, 2);

    let mut expected = String::from("site,url\n");
    for location in &locations {
        expected.push_str(&format!("{},{}\n", present, location));
    }
    assert_eq!(read_output(&config), expected);
}

#[tokio::test]
async fn test_redirect_is_a_fetch_failure() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/elsewhere/sitemap.xml"),
        )
        .expect(1)
        .mount(&server)
        .await;
    // The redirect target must never be requested
    Mock::given(method("GET"))
        .and(path("/elsewhere/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(sitemap_body(&[format!("{}/x", base_url)])),
        )
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[base_url]);

    let mut harvester = Harvester::from_config(&config).unwrap();
    let stats = harvester.run().await.unwrap();

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(read_output(&config), "site,url\n");
}

#[tokio::test]
async fn test_url_without_loc_contributes_nothing() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let body = format!(
        r#"<urlset xmlns="{ns}">
  <url><loc>{b}/first</loc></url>
  <url><lastmod>2024-01-01</lastmod></url>
  <url><loc>{b}/last</loc></url>
</urlset>"#,
        ns = NS,
        b = base_url
    );
    mount_sitemap(&server, "/sitemap.xml", 200, body).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[base_url.clone()]);

    Harvester::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(
        read_output(&config),
        format!(
            "site,url\n{b},{b}/first\n{b},{b}/last\n",
            b = base_url
        )
    );
}

#[tokio::test]
async fn test_malformed_sitemap_does_not_stop_the_run() {
    let server = MockServer::start().await;
    let broken = format!("{}/broken", server.uri());
    let good = format!("{}/good", server.uri());

    mount_sitemap(
        &server,
        "/broken/sitemap.xml",
        200,
        "<html><body>oops</p></html>".to_string(),
    )
    .await;
    mount_sitemap(
        &server,
        "/good/sitemap.xml",
        200,
        sitemap_body(&[format!("{}/ok", good)]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[broken, good.clone()]);

    let stats = Harvester::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(stats.parse_failures, 1);
    assert_eq!(read_output(&config), format!("site,url\n{g},{g}/ok\n", g = good));
}

#[tokio::test]
async fn test_empty_input_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[]);

    let stats = Harvester::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(stats.sites_processed, 0);
    assert_eq!(read_output(&config), "site,url\n");
}

#[tokio::test]
async fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.input.path = dir.path().join("absent.csv").display().to_string();
    config.output.path = dir.path().join("sites.csv").display().to_string();

    let err = Harvester::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Input(InputError::Io { .. })));
    assert!(!Path::new(&config.output.path).exists());
}

#[tokio::test]
async fn test_missing_url_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("base_urls.csv");
    std::fs::write(&input, "site\nhttps://a.test\n").unwrap();

    let mut config = Config::default();
    config.input.path = input.display().to_string();
    config.output.path = dir.path().join("sites.csv").display().to_string();

    let err = Harvester::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HarvestError::Input(InputError::MissingColumn { .. })
    ));
}

#[tokio::test]
async fn test_repeated_runs_are_byte_identical() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let locations = vec![
        format!("{}/a,b", base_url),
        format!("{}/c", base_url),
        format!("{}/c", base_url),
    ];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_body(&locations)))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[base_url]);

    Harvester::from_config(&config).unwrap().run().await.unwrap();
    let first = std::fs::read(&config.output.path).unwrap();

    Harvester::from_config(&config).unwrap().run().await.unwrap();
    let second = std::fs::read(&config.output.path).unwrap();

    assert_eq!(first, second);
    assert_eq!(String::from_utf8(first).unwrap().lines().count(), 4);
}

#[tokio::test]
async fn test_timeout_is_a_fetch_failure() {
    let server = MockServer::start().await;
    let slow = format!("{}/slow", server.uri());
    let fast = format!("{}/fast", server.uri());

    Mock::given(method("GET"))
        .and(path("/slow/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sitemap_body(&[format!("{}/never", slow)]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_sitemap(
        &server,
        "/fast/sitemap.xml",
        200,
        sitemap_body(&[format!("{}/page", fast)]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), &[slow, fast.clone()]);
    config.http.timeout_secs = Some(1);

    let stats = Harvester::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(read_output(&config), format!("site,url\n{f},{f}/page\n", f = fast));
}

#[tokio::test]
async fn test_inline_sites_take_precedence() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_sitemap(
        &server,
        "/custom-map.xml",
        200,
        sitemap_body(&[format!("{}/x", base_url)]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), &["http://127.0.0.1:9/unused".to_string()]);
    config.sites = vec![base_url.clone()];
    config.sitemap.path = "/custom-map.xml".to_string();

    Harvester::from_config(&config).unwrap().run().await.unwrap();

    assert_eq!(
        read_output(&config),
        format!("site,url\n{b},{b}/x\n", b = base_url)
    );
}

/// In-memory transport serving one fixed sitemap
struct FixedClient {
    url: String,
    body: String,
}

impl HttpClient for FixedClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchFailure> {
        if url == self.url {
            Ok(HttpResponse {
                status: 200,
                body: self.body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 404,
                body: String::new(),
            })
        }
    }
}

#[tokio::test]
async fn test_reference_example_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("base_urls.csv");
    let output = dir.path().join("sites.csv");
    std::fs::write(&input, "url\nhttps://a.test\n").unwrap();

    let client = FixedClient {
        url: "https://a.test/sitemap.xml".to_string(),
        body: r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://a.test/x</loc></url></urlset>"#
            .to_string(),
    };

    let mut harvester = Harvester::new(
        UrlSource::csv(&input, "url"),
        SitemapFetcher::new(client, "/sitemap.xml"),
        SitemapParser::default(),
        RecordStore::new(),
        CsvWriter::new(&output),
    );
    harvester.run().await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "site,url\nhttps://a.test,https://a.test/x\n"
    );
}
