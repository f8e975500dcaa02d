//! Seed list loading and per-host deduplication.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use url::Url;

use crate::error::{CrawlError, Result};
use crate::scrape::authority;

/// One surviving seed: its original URL string and lowercased host authority
/// (`host`, or `host:port` when the seed names a non-default port).
pub struct Seed {
    pub url: String,
    pub host: String,
}

/// Read a newline-separated URL list, trimming whitespace per line and
/// dropping blank lines.
pub fn read_seed_list(path: &Path) -> Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).map_err(|_| CrawlError::SeedListUnreadable(path.to_path_buf()))?;
    Ok(contents
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Deduplicate seeds by lowercased host, keeping only the first occurrence of
/// each host. Seeds with an empty host, an unparsable URL, or a non-http(s)
/// scheme are skipped.
pub fn dedup_by_host(urls: &[String]) -> Vec<Seed> {
    let mut seen_hosts = HashSet::new();
    let mut out = Vec::new();
    for url in urls {
        let Ok(parsed) = Url::parse(url) else {
            continue;
        };
        if !parsed.scheme().eq_ignore_ascii_case("http") && !parsed.scheme().eq_ignore_ascii_case("https") {
            continue;
        }
        let Some(host) = authority(&parsed) else {
            continue;
        };
        if host.is_empty() {
            continue;
        }
        let host = host.to_ascii_lowercase();
        if seen_hosts.insert(host.clone()) {
            out.push(Seed {
                url: url.clone(),
                host,
            });
        }
    }
    out
}
