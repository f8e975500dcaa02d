//! Crawler: deduplicates seeds by host, spawns one Spider per surviving seed,
//! and caps how many Spiders run concurrently.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::{build_http_client, HttpTimeouts};
use crate::output::{validate_output_dir, DomainOutput};
use crate::seeds::{dedup_by_host, read_seed_list};
use crate::spider::{run_spider, SpiderConfig};

pub async fn run_crawl(args: &Cli) -> anyhow::Result<()> {
    let seed_lines = read_seed_list(&args.url_list)?;
    validate_output_dir(&args.log_output_dir)?;

    let seeds = dedup_by_host(&seed_lines);

    let timeouts = HttpTimeouts::from_env();
    let client = build_http_client(&timeouts)?;

    let permits = Arc::new(Semaphore::new(args.max_processes.max(1)));
    let limit = args.limit_mode();
    let max_fetchers = args.max_fetchers;
    let verbose = args.verbose;
    let out_dir = args.log_output_dir.clone();

    let mut handles = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let permit = Arc::clone(&permits).acquire_owned().await?;

        if verbose {
            info!("Spawned spider for: {}", seed.url);
        }

        let client = client.clone();
        let out_dir = out_dir.clone();

        let handle = tokio::spawn(async move {
            // The permit lives for the Spider's whole lifetime and is
            // released (dropped) only when the Spider completes.
            let _permit = permit;

            let output = match DomainOutput::create(&out_dir, &seed.host, chrono::Local::now()) {
                Ok(o) => o,
                Err(e) => {
                    error!("failed to prepare output directory for {}: {}", seed.host, e);
                    return None;
                }
            };

            let cfg = SpiderConfig {
                seed_url: seed.url,
                domain: seed.host,
                limit,
                max_fetchers,
            };
            Some(run_spider(client, cfg, output).await)
        });
        handles.push(handle);
    }

    for handle in handles {
        if let Some(report) = handle.await? {
            if verbose {
                info!(
                    "Spider for {} completed: {} pages scanned, {} emails found",
                    report.domain, report.pages_scanned, report.emails_found
                );
            }
        }
    }

    Ok(())
}
