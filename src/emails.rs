//! Email extraction and per-Spider de-duplication, first-seen order.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+").expect("valid email regex")
    })
}

/// Find every regex match in `text`, in order of appearance (duplicates included).
pub fn find_emails(text: &str) -> Vec<String> {
    email_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tracks every email address already reported for one Spider so that the
/// result file contains each address at most once, in first-seen order.
#[derive(Default)]
pub struct EmailSink {
    seen: HashSet<String>,
}

impl EmailSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Record `found` (which may itself contain duplicates) and return only
    /// the addresses that have never been seen by this sink before, in the
    /// order they first appear.
    pub fn record(&mut self, found: Vec<String>) -> Vec<String> {
        let mut fresh = Vec::new();
        for email in found {
            if self.seen.insert(email.clone()) {
                fresh.push(email);
            }
        }
        fresh
    }
}
