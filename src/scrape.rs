//! Per-domain link scraper: parses one page's HTML, canonicalizes anchor
//! targets, scopes them to the owning domain, and reports only the ones
//! never seen before for this domain.

use std::collections::HashSet;

use scraper::{Html, Selector};
use sha2::{Digest, Sha256};
use url::Url;

/// The host, plus `:{port}` when one is present, exactly as it would need to
/// appear in a rebuilt `http://{authority}{path}` URL. Used as the crate's
/// notion of "domain" throughout so that non-default-port seeds (e.g. a test
/// server bound to `127.0.0.1:PORT`) still canonicalize to themselves.
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Canonicalize the Spider's own seed URL: percent-encode the path and
/// normalize backslashes, but keep the seed's own scheme and host (no domain
/// substitution; the seed is always fetched regardless of scheme).
pub fn canonicalize_seed(seed_url: &str) -> String {
    match Url::parse(seed_url) {
        Ok(u) => u.to_string().replace('\\', "/"),
        Err(_) => seed_url.replace('\\', "/"),
    }
}

fn digest(url: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.finalize().into()
}

/// Canonicalize one anchor `href` relative to `domain` (a host, or
/// `host:port` authority). Returns `None` for external, malformed, or
/// unsupported-scheme hrefs.
fn canonicalize_href(href: &str, domain: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    // Resolve against a synthetic `http://{domain}/` base regardless of
    // whether `href` is relative, scheme-relative (`//other.test/...`), or
    // already absolute; an absolute `href` simply overrides the base as
    // `Url::join` would for any other reference. The authority/scheme of the
    // *resolved* URL, not of `href` itself, decides internal vs. external.
    let base = Url::parse(&format!("http://{domain}/")).ok()?;
    let resolved = base.join(href).ok()?;

    if !resolved.scheme().eq_ignore_ascii_case("http") {
        return None;
    }
    let same_authority = authority(&resolved)
        .map(|a| a.eq_ignore_ascii_case(domain))
        .unwrap_or(false);
    if !same_authority {
        return None;
    }

    let mut path = resolved.path().to_string();
    if path.is_empty() {
        path = "/".to_string();
    }

    let mut out = format!("http://{domain}{path}");
    if let Some(q) = resolved.query() {
        out.push('?');
        out.push_str(q);
    }
    if let Some(f) = resolved.fragment() {
        out.push('#');
        out.push_str(f);
    }
    Some(out.replace('\\', "/"))
}

/// Stateful per-domain scraper: owns the visited-link digest memory for one
/// Spider. Not re-entrant; callers must serialize access (e.g. behind a
/// `tokio::sync::Mutex`) when more than one fetcher is in flight.
pub struct Scraper {
    domain: String,
    visited: HashSet<[u8; 32]>,
}

impl Scraper {
    /// `domain` is lowercased; `seed_url` (already canonicalized) is marked
    /// visited up front so it is never re-queued.
    pub fn new(domain: &str, seed_url: &str) -> Self {
        let mut visited = HashSet::new();
        visited.insert(digest(seed_url));
        Self {
            domain: domain.to_ascii_lowercase(),
            visited,
        }
    }

    /// Parse `content` as HTML and return the ordered list of canonical
    /// internal links not previously reported for this domain.
    pub fn extract_internal_links(&mut self, content: &str) -> Vec<String> {
        let document = Html::parse_document(content);
        let selector = Selector::parse("a[href]").expect("static selector is valid");

        let mut fresh = Vec::new();
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(canonical) = canonicalize_href(href, &self.domain) else {
                continue;
            };
            if self.visited.insert(digest(&canonical)) {
                fresh.push(canonical);
            }
        }
        fresh
    }
}
