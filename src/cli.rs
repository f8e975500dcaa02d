//! CLI surface (clap derive API).

use std::path::PathBuf;

use clap::Parser;

use crate::spider::LimitMode;

#[derive(Parser, Debug)]
#[command(
    name = "mailreaper",
    about = "Crawl a list of seed domains in parallel and harvest email addresses from their pages"
)]
pub struct Cli {
    /// File containing newline-separated seed URLs.
    pub url_list: PathBuf,

    /// Maximum number of slashes permitted in a crawled URL's path.
    ///
    /// This is the literal count of '/' characters in the path component, not
    /// "levels deep from root": a page at /a/b/c has three slashes.
    #[arg(short = 'd', long, default_value_t = 10, conflicts_with = "count")]
    pub depth: usize,

    /// Maximum number of pages to scan per domain (mutually exclusive with --depth).
    #[arg(short = 'c', long, conflicts_with = "depth")]
    pub count: Option<usize>,

    /// Maximum number of domains crawled concurrently.
    #[arg(short = 'm', long = "max-processes", default_value_t = 10)]
    pub max_processes: usize,

    /// Maximum number of concurrent fetches within a single domain's crawl.
    #[arg(short = 'f', long = "max-fetchers", default_value_t = 20)]
    pub max_fetchers: usize,

    /// Directory under which per-domain output directories are created.
    #[arg(short = 'o', long = "log-output-dir", default_value = ".")]
    pub log_output_dir: PathBuf,

    /// Emit a progress line per Spider spawn/completion.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn limit_mode(&self) -> LimitMode {
        match self.count {
            Some(c) => LimitMode::Count(c),
            None => LimitMode::Depth(self.depth),
        }
    }
}
