//! Per-domain filesystem output: the `<host>__<timestamp>` directory, its
//! `emails.txt`, and its append-only `scan_log.txt`.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{CrawlError, Result};

/// Replace every character that isn't ASCII alphanumeric with `_`.
pub fn sanitize_host(host: &str) -> String {
    host.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// The exclusively-owned output surface for one Spider.
pub struct DomainOutput {
    dir: PathBuf,
    emails_path: PathBuf,
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl DomainOutput {
    /// Create `<base_dir>/<sanitized_host>__<YYYYMMDD_HHMMSS>`.
    pub fn create(base_dir: &Path, host: &str, now: chrono::DateTime<chrono::Local>) -> Result<Self> {
        let dir_name = format!("{}__{}", sanitize_host(host), now.format("%Y%m%d_%H%M%S"));
        let dir = base_dir.join(dir_name);
        std::fs::create_dir_all(&dir).map_err(|e| CrawlError::OutputDirCreate(dir.clone(), e))?;
        Ok(Self {
            emails_path: dir.join("emails.txt"),
            log_path: dir.join("scan_log.txt"),
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append newly-seen emails, one per line. Exclusive across all fetchers
    /// of this Spider; a write failure here is fatal to the Spider only.
    pub async fn append_emails(&self, emails: &[String]) -> Result<()> {
        if emails.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;
        let mut body = String::new();
        for email in emails {
            body.push_str(email);
            body.push('\n');
        }
        append_file(&self.emails_path, &body).await
    }

    /// Best-effort append to `scan_log.txt`; logging failures are not fatal.
    pub async fn log_line(&self, line: &str) {
        let mut body = line.to_string();
        body.push('\n');
        let _ = append_file(&self.log_path, &body).await;
    }
}

async fn append_file(path: &Path, contents: &str) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| CrawlError::FileWrite(path.to_path_buf(), e))?;
    file.write_all(contents.as_bytes())
        .await
        .map_err(|e| CrawlError::FileWrite(path.to_path_buf(), e))?;
    Ok(())
}

/// Check that `dir` exists, is a directory, and is writable.
pub fn validate_output_dir(dir: &Path) -> Result<()> {
    let meta = std::fs::metadata(dir).map_err(|_| CrawlError::OutputDirUnwritable(dir.to_path_buf()))?;
    if !meta.is_dir() {
        return Err(CrawlError::OutputDirUnwritable(dir.to_path_buf()));
    }
    let probe = dir.join(".mailreaper_write_check");
    std::fs::write(&probe, b"").map_err(|_| CrawlError::OutputDirUnwritable(dir.to_path_buf()))?;
    let _ = std::fs::remove_file(&probe);
    Ok(())
}
