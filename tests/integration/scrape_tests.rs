//! Integration tests for the scraper
//!
//! These tests use wiremock to serve listing and detail pages and run the
//! full page loop end-to-end over real HTTP, down to the CSV file.

use dsei_scraper::config::{load_config, Config};
use dsei_scraper::crawler::run_scrape;
use dsei_scraper::ScrapeError;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/visit/exhibiting-companies";

/// Creates a test configuration pointing at the mock server, with no delays
fn create_test_config(base_url: &str, csv_path: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.http.timeout_secs = 5;
    config.delays.between_companies_ms = 0;
    config.delays.between_pages_ms = 0;
    config.output.csv_path = csv_path.display().to_string();
    config
}

fn listing_page(slugs: &[&str]) -> String {
    let entries: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li class="m-exhibitors-list__items__item">
                     <a class="js-librarylink-entry"
                        href="javascript:openRemoteModal('exhibitors-list/{}','ajax',{{}},'')">{}</a>
                   </li>"#,
                slug, slug
            )
        })
        .collect();
    format!(
        r#"<html><body><ul class="m-exhibitors-list__items">{}</ul></body></html>"#,
        entries
    )
}

fn detail_page(name: &str, tags: &[&str], overview: &str, website: &str) -> String {
    let tags: String = tags
        .iter()
        .map(|tag| {
            format!(
                r#"<li class="m-exhibitor-entry__item__header__categories__item">{}</li>"#,
                tag
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="m-exhibitor-entry">
             <h1 class="m-exhibitor-entry__item__header__title">{}</h1>
             <ul>{}</ul>
             <div class="m-exhibitor-entry__item__body__description"><p>{}</p></div>
             <a href="https://www.linkedin.com/company/example">LinkedIn</a>
             <a href="{}">Website</a>
           </div></body></html>"#,
        name, tags, overview, website
    )
}

async fn mount_listing(server: &MockServer, page: u32, slugs: &[&str]) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(slugs)))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, slug: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/exhibitors-list/{}", slug)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output CSV");
    let headers: Vec<String> = reader
        .headers()
        .expect("Missing CSV header")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, vec!["company_name", "tags", "overview", "website"]);

    reader
        .records()
        .map(|row| row.expect("Bad CSV row").iter().map(str::to_string).collect())
        .collect()
}

#[tokio::test]
async fn test_full_scrape_two_companies() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("processed").join("companies.csv");

    // Listing requests must carry the XHR header set
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "1"))
        .and(query_param("searchgroup", "65207D8C-exhibitors-list"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&["wind-river", "acme-defence"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_listing(&mock_server, 2, &[]).await;

    mount_detail(
        &mock_server,
        "wind-river",
        detail_page(
            "Wind River",
            &["Cyber", "Digital Transformation"],
            "Software for mission-critical, intelligent systems.",
            "https://www.windriver.com",
        ),
    )
    .await;
    mount_detail(
        &mock_server,
        "acme-defence",
        detail_page("Acme Defence", &[], "", "https://acme-defence.example/"),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let summary = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.companies_found, 2);
    assert_eq!(summary.records_written, Some(2));

    let rows = read_rows(&csv_path);
    assert_eq!(
        rows,
        vec![
            vec![
                "Wind River",
                "Cyber; Digital Transformation",
                "Software for mission-critical, intelligent systems.",
                "https://www.windriver.com",
            ],
            vec!["Acme Defence", "", "", "https://acme-defence.example/"],
        ]
    );
}

#[tokio::test]
async fn test_detail_request_carries_page_and_search_group() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");

    mount_listing(&mock_server, 2, &["late-entry"]).await;
    mount_listing(&mock_server, 3, &[]).await;

    Mock::given(method("GET"))
        .and(path("/exhibitors-list/late-entry"))
        .and(query_param("page", "2"))
        .and(query_param("searchgroup", "libraryentry-exhibitors-list"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(
            "Late Entry",
            &[],
            "",
            "",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), &csv_path);
    config.run.start_page = 2;

    run_scrape(&config).await.expect("Scrape failed");

    let rows = read_rows(&csv_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "Late Entry");
}

#[tokio::test]
async fn test_first_page_failure_writes_nothing() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let result = run_scrape(&config).await;

    match result {
        Err(ScrapeError::FirstPageUnreachable { page, reason, .. }) => {
            assert_eq!(page, 1);
            assert!(reason.contains("500"), "unexpected reason: {}", reason);
        }
        other => panic!("Expected FirstPageUnreachable, got {:?}", other),
    }
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn test_first_page_timeout_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&["wind-river"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), &csv_path);
    config.http.timeout_secs = 1;

    match run_scrape(&config).await {
        Err(ScrapeError::FirstPageUnreachable { page, reason, .. }) => {
            assert_eq!(page, 1);
            assert!(reason.contains("timed out"), "unexpected reason: {}", reason);
        }
        other => panic!("Expected FirstPageUnreachable, got {:?}", other),
    }
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn test_later_page_timeout_ends_pagination() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");

    mount_listing(&mock_server, 1, &["wind-river"]).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&["acme-defence"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_detail(
        &mock_server,
        "wind-river",
        detail_page("Wind River", &[], "", ""),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), &csv_path);
    config.http.timeout_secs = 1;

    let summary = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(read_rows(&csv_path), vec![vec!["Wind River", "", "", ""]]);
}

#[tokio::test]
async fn test_later_page_failure_keeps_collected_records() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");

    mount_listing(&mock_server, 1, &["wind-river"]).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    mount_detail(
        &mock_server,
        "wind-river",
        detail_page("Wind River", &["Cyber"], "Overview", "https://www.windriver.com"),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let summary = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.records_written, Some(1));
    let rows = read_rows(&csv_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "Wind River");
}

#[tokio::test]
async fn test_max_pages_limits_listing_requests() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");

    for (page, slug) in [(1, "alpha"), (2, "bravo")] {
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[slug])))
            .expect(1)
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["charlie"])))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_detail(&mock_server, "alpha", detail_page("Alpha", &[], "", "")).await;
    mount_detail(&mock_server, "bravo", detail_page("Bravo", &[], "", "")).await;

    let mut config = create_test_config(&mock_server.uri(), &csv_path);
    config.run.max_pages = Some(2);

    run_scrape(&config).await.expect("Scrape failed");

    let names: Vec<String> = read_rows(&csv_path).into_iter().map(|row| row[0].clone()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo"]);
}

#[tokio::test]
async fn test_failed_detail_strict_and_permissive() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&mock_server, 1, &["wind-river", "gone"]).await;
    mount_listing(&mock_server, 2, &[]).await;
    mount_detail(
        &mock_server,
        "wind-river",
        detail_page("Wind River", &[], "", ""),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/exhibitors-list/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let permissive_path = dir.path().join("permissive.csv");
    let config = create_test_config(&mock_server.uri(), &permissive_path);
    let summary = run_scrape(&config).await.expect("Scrape failed");
    assert_eq!(summary.detail_failures, 1);
    assert_eq!(
        read_rows(&permissive_path),
        vec![
            vec!["Wind River", "", "", ""],
            vec!["", "", "", ""],
        ]
    );

    let strict_path = dir.path().join("strict.csv");
    let mut config = create_test_config(&mock_server.uri(), &strict_path);
    config.run.strict = true;
    let summary = run_scrape(&config).await.expect("Scrape failed");
    assert_eq!(summary.records_skipped, 1);
    assert_eq!(read_rows(&strict_path), vec![vec!["Wind River", "", "", ""]]);
}

#[tokio::test]
async fn test_empty_directory_writes_header_only() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");

    mount_listing(&mock_server, 1, &[]).await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let summary = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(summary.records_written, Some(0));
    assert!(read_rows(&csv_path).is_empty());
}

#[tokio::test]
async fn test_path_resolver_from_config_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                 <a class="exhibitor" href="/exhibitors-list/plain-link">Plain Link</a>
                 <a class="exhibitor" href="/news/elsewhere">Not a company</a>
               </body></html>"#,
        ))
        .mount(&mock_server)
        .await;
    mount_listing(&mock_server, 2, &[]).await;
    mount_detail(
        &mock_server,
        "plain-link",
        detail_page("Plain Link Ltd", &["Land"], "Vehicles", "https://plain.example"),
    )
    .await;

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[site]
base-url = "{}"

[delays]
between-companies-ms = 0
between-pages-ms = 0

[selectors]
company-links = "a.exhibitor"
slug-resolver = "path"

[output]
csv-path = "{}"
tags-separator = " | "
"#,
        mock_server.uri(),
        csv_path.display().to_string().replace('\\', "/")
    )
    .unwrap();

    let config = load_config(file.path()).expect("Config should load");
    run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(
        read_rows(&csv_path),
        vec![vec!["Plain Link Ltd", "Land", "Vehicles", "https://plain.example"]]
    );
}
