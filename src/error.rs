//! Error types for the crawler core.
//!
//! Input-validation failures map to the CLI's non-zero exit path; everything
//! else (transient network failures, non-textual content) is recovered from
//! locally and never surfaces as a `CrawlError`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("seed list file is not readable: {0}")]
    SeedListUnreadable(PathBuf),

    #[error("log output directory is not writable: {0}")]
    OutputDirUnwritable(PathBuf),

    #[error("failed to create domain output directory {0}: {1}")]
    OutputDirCreate(PathBuf, #[source] std::io::Error),

    #[error("failed to write {0}: {1}")]
    FileWrite(PathBuf, #[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
