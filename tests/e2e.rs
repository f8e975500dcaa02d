//! End-to-end crawl scenarios driven against `wiremock` stub servers (§8).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mailreaper::cli::Cli;
use mailreaper::crawler::run_crawl;

static TEST_SEQ: AtomicUsize = AtomicUsize::new(0);

fn scratch_dir(tag: &str) -> PathBuf {
    let n = TEST_SEQ.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "mailreaper-e2e-{tag}-{}-{n}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_seed_file(dir: &Path, urls: &[String]) -> PathBuf {
    let path = dir.join("seeds.txt");
    std::fs::write(&path, urls.join("\n")).unwrap();
    path
}

fn cli_for(url_list: PathBuf, log_output_dir: PathBuf, count: Option<usize>, depth: usize) -> Cli {
    Cli {
        url_list,
        depth,
        count,
        max_processes: 4,
        max_fetchers: 4,
        log_output_dir,
        verbose: false,
    }
}

fn only_domain_dir(out_dir: &Path) -> PathBuf {
    let dirs: Vec<_> = std::fs::read_dir(out_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    assert_eq!(dirs.len(), 1, "expected exactly one domain output dir");
    dirs.into_iter().next().unwrap()
}

#[tokio::test]
async fn crawls_linked_page_and_harvests_its_email() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(r#"<html><body><a href="/contact">contact</a></body></html>"#),
        )
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html").set_body_string(
            r#"<html><body>reach us at hello@example.test or back <a href="/">home</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    let dir = scratch_dir("basic");
    let seed_file = write_seed_file(&dir, &[server.uri()]);
    let out_dir = dir.join("out");
    std::fs::create_dir_all(&out_dir).unwrap();

    let cli = cli_for(seed_file, out_dir.clone(), None, 10);
    run_crawl(&cli).await.unwrap();

    let domain_dir = only_domain_dir(&out_dir);
    let emails = std::fs::read_to_string(domain_dir.join("emails.txt")).unwrap();
    assert_eq!(emails.trim(), "hello@example.test");

    let log = std::fs::read_to_string(domain_dir.join("scan_log.txt")).unwrap();
    assert!(log.contains("Crawling started"));
    assert!(log.contains("Crawling ended"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn count_limit_stops_scanning_after_n_pages() {
    let server = MockServer::start().await;
    let chain_len = 5;
    for i in 0..chain_len {
        let here = format!("/{i}");
        let next = format!("/{}", i + 1);
        let body = format!(r#"<html><body><a href="{next}">next</a></body></html>"#);

        Mock::given(method("HEAD"))
            .and(path(here.clone()))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(here))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;
    }

    let dir = scratch_dir("count");
    let seed_file = write_seed_file(&dir, &[format!("{}/0", server.uri())]);
    let out_dir = dir.join("out");
    std::fs::create_dir_all(&out_dir).unwrap();

    let cli = cli_for(seed_file, out_dir.clone(), Some(2), 10);
    run_crawl(&cli).await.unwrap();

    let domain_dir = only_domain_dir(&out_dir);
    let log = std::fs::read_to_string(domain_dir.join("scan_log.txt")).unwrap();
    assert!(log.contains("Pages Scanned: 2"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn non_text_content_type_is_never_fetched_with_get() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("content-type", "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let dir = scratch_dir("nontext");
    let seed_file = write_seed_file(&dir, &[server.uri()]);
    let out_dir = dir.join("out");
    std::fs::create_dir_all(&out_dir).unwrap();

    let cli = cli_for(seed_file, out_dir.clone(), None, 10);
    run_crawl(&cli).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.to_string() != "GET"));

    let domain_dir = only_domain_dir(&out_dir);
    let log = std::fs::read_to_string(domain_dir.join("scan_log.txt")).unwrap();
    assert!(log.contains("Pages Scanned: 0"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn seeds_sharing_a_host_spawn_only_one_spider() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html></html>"),
        )
        .mount(&server)
        .await;

    let dir = scratch_dir("dedup");
    let base = server.uri();
    let seed_file = write_seed_file(&dir, &[format!("{base}/"), format!("{base}/other")]);
    let out_dir = dir.join("out");
    std::fs::create_dir_all(&out_dir).unwrap();

    let cli = cli_for(seed_file, out_dir.clone(), None, 10);
    run_crawl(&cli).await.unwrap();

    only_domain_dir(&out_dir);

    std::fs::remove_dir_all(&dir).unwrap();
}
