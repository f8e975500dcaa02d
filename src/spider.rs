//! Spider: crawls one domain breadth-first under a depth or page-count
//! limit, harvesting emails until the frontier drains or the limit is
//! reached.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::warn;
use url::Url;

use crate::emails::EmailSink;
use crate::output::DomainOutput;
use crate::scrape::{canonicalize_seed, Scraper};

/// Which kind of limit bounds this Spider's crawl, and its value.
#[derive(Debug, Clone, Copy)]
pub enum LimitMode {
    /// Maximum number of '/' characters allowed in a URL's path.
    Depth(usize),
    /// Maximum number of pages scanned before admission stops.
    Count(usize),
}

impl LimitMode {
    fn admits(&self, url: &str, pages_scanned: usize) -> bool {
        match self {
            LimitMode::Depth(max) => {
                let path = Url::parse(url)
                    .map(|u| u.path().to_string())
                    .unwrap_or_default();
                path.matches('/').count() <= *max
            }
            LimitMode::Count(max) => pages_scanned < *max,
        }
    }
}

pub struct SpiderConfig {
    pub seed_url: String,
    pub domain: String,
    pub limit: LimitMode,
    pub max_fetchers: usize,
}

/// Summary of one completed Spider, used only for the Crawler's verbose
/// completion line, not a shared error channel between Spiders.
#[derive(Debug, Clone)]
pub struct SpiderReport {
    pub domain: String,
    pub pages_scanned: usize,
    pub emails_found: usize,
}

/// Run one Spider to completion: drain the frontier under the configured
/// limit, then release ownership of `output` (dropped at the end of this
/// function along with every other Spider-exclusive resource).
pub async fn run_spider(
    client: reqwest::Client,
    cfg: SpiderConfig,
    output: DomainOutput,
) -> SpiderReport {
    let output = Arc::new(output);
    output
        .log_line(&format!(
            "[+][{}] Crawling started at domain: {}",
            chrono::Local::now().format("%H:%M:%S %d/%m/%Y"),
            cfg.domain
        ))
        .await;

    let seed = canonicalize_seed(&cfg.seed_url);
    let scraper = Arc::new(Mutex::new(Scraper::new(&cfg.domain, &seed)));

    let frontier: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
    frontier.lock().await.push_back(seed);

    let pages_scanned = Arc::new(AtomicUsize::new(0));
    let email_sink = Arc::new(Mutex::new(EmailSink::new()));
    let write_failed = Arc::new(AtomicBool::new(false));
    let sem = Arc::new(Semaphore::new(cfg.max_fetchers.max(1)));
    let limit = cfg.limit;

    let mut join_set: JoinSet<()> = JoinSet::new();
    let mut admitting = true;

    loop {
        loop {
            if !admitting || write_failed.load(Ordering::SeqCst) {
                admitting = false;
                break;
            }
            let maybe_url = frontier.lock().await.pop_front();
            let Some(url) = maybe_url else {
                break;
            };
            let scanned_now = pages_scanned.load(Ordering::SeqCst);
            if !limit.admits(&url, scanned_now) {
                admitting = false;
                break;
            }

            let permit = match Arc::clone(&sem).acquire_owned().await {
                Ok(p) => p,
                Err(_) => {
                    admitting = false;
                    break;
                }
            };

            let client = client.clone();
            let scraper = Arc::clone(&scraper);
            let frontier = Arc::clone(&frontier);
            let pages_scanned = Arc::clone(&pages_scanned);
            let email_sink = Arc::clone(&email_sink);
            let write_failed = Arc::clone(&write_failed);
            let output = Arc::clone(&output);
            join_set.spawn(async move {
                let _permit = permit;
                fetch_and_scan(
                    client,
                    url,
                    scraper,
                    frontier,
                    pages_scanned,
                    email_sink,
                    write_failed,
                    output,
                )
                .await;
            });
        }

        if join_set.is_empty() {
            break;
        }
        join_set.join_next().await;
    }

    // Drain any frontier entries discovered by the last wave of in-flight
    // fetchers but never dispatched.
    frontier.lock().await.clear();

    let report = SpiderReport {
        domain: cfg.domain,
        pages_scanned: pages_scanned.load(Ordering::SeqCst),
        emails_found: email_sink.lock().await.len(),
    };

    output
        .log_line(&format!(
            "[+][{}] Crawling ended.",
            chrono::Local::now().format("%H:%M:%S %d/%m/%Y")
        ))
        .await;
    output
        .log_line(&format!("[*] Pages Scanned: {}", report.pages_scanned))
        .await;

    report
}

/// One fetcher's body: HEAD, content-type gate, GET, email scan, internal-link
/// discovery.
#[allow(clippy::too_many_arguments)]
async fn fetch_and_scan(
    client: reqwest::Client,
    url: String,
    scraper: Arc<Mutex<Scraper>>,
    frontier: Arc<Mutex<VecDeque<String>>>,
    pages_scanned: Arc<AtomicUsize>,
    email_sink: Arc<Mutex<EmailSink>>,
    write_failed: Arc<AtomicBool>,
    output: Arc<DomainOutput>,
) {
    let head = match client.head(&url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!("connection failure on HEAD {}: {}", url, e);
            output
                .log_line(&format!("\t[-] Failure to request: {url} | Connection Error."))
                .await;
            return;
        }
    };

    let content_type = head
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.starts_with("text/") {
        return;
    }

    output.log_line(&format!("\t[*] Scanning {url}")).await;
    pages_scanned.fetch_add(1, Ordering::SeqCst);

    let get_resp = match client.get(&url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!("connection failure on GET {}: {}", url, e);
            output
                .log_line(&format!("\t[-] Failure to request: {url} | Connection Error."))
                .await;
            return;
        }
    };

    let body = match get_resp.text().await {
        Ok(b) => b,
        Err(e) => {
            warn!("failed to read response body for {}: {}", url, e);
            return;
        }
    };

    let found = crate::emails::find_emails(&body);
    if !found.is_empty() {
        let fresh = email_sink.lock().await.record(found);
        if !fresh.is_empty() {
            if let Err(e) = output.append_emails(&fresh).await {
                warn!("fatal: failed to write emails.txt: {}", e);
                write_failed.store(true, Ordering::SeqCst);
            }
        }
    }

    let new_links = scraper.lock().await.extract_internal_links(&body);
    frontier.lock().await.extend(new_links);
}
