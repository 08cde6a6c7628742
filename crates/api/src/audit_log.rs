//! Append-only upload log on local (usually network-mounted) disk.
//!
//! The log may be shared by several servers. Every append takes an in-process
//! mutex and an exclusive `flock` on the file, then numbers the new line from
//! the lines already present. Line `n` of the file therefore carries
//! sequence `n`, whichever process wrote the lines before it.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use babycontest_core::audit::AuditLine;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(10);
const LOCK_MAX_ATTEMPTS: u32 = 500;

/// Errors raised while appending to the upload log.
#[derive(Debug, thiserror::Error)]
pub enum AuditLogError {
    #[error("Failed to read audit log {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write audit log {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to lock audit log {path}: {source}")]
    Lock {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// The upload log file.
pub struct AuditLog {
    path: PathBuf,
    hostname: String,
    /// Serialises appends from this process; `flock` covers other processes.
    write_lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>, hostname: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hostname: hostname.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line for an upload recorded at `local_url`.
    pub async fn append(&self, local_url: &str) -> Result<AuditLine, AuditLogError> {
        let _guard = self.write_lock.lock().await;

        let write_err = |source| AuditLogError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_err)?;

        lock_exclusive(&file)
            .await
            .map_err(|source| AuditLogError::Lock {
                path: self.path.display().to_string(),
                source,
            })?;

        let previous = count_lines(&mut file)
            .await
            .map_err(|source| AuditLogError::Read {
                path: self.path.display().to_string(),
                source,
            })?;

        let line = AuditLine {
            timestamp: chrono::Local::now().naive_local(),
            sequence: previous + 1,
            local_url: local_url.to_string(),
            hostname: self.hostname.clone(),
        };

        file.write_all(format!("{line}\n").as_bytes())
            .await
            .map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        // The flock is released when `file` is closed.
        drop(file);

        tracing::debug!(sequence = line.sequence, path = %self.path.display(), "Appended audit line");
        Ok(line)
    }
}

/// Number of lines in `file`, read from its current (start) position.
async fn count_lines(file: &mut File) -> io::Result<u64> {
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(count);
        }
        count += 1;
    }
}

#[cfg(unix)]
async fn lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::fd::AsRawFd;

    let fd = file.as_raw_fd();
    let mut attempts = 0;
    loop {
        // Safety: `fd` belongs to `file`, which outlives this call.
        if unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) } == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::WouldBlock || attempts >= LOCK_MAX_ATTEMPTS {
            return Err(err);
        }
        attempts += 1;
        tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
    }
}

#[cfg(not(unix))]
async fn lock_exclusive(_file: &File) -> io::Result<()> {
    Ok(())
}

/// This machine's hostname, for the `DNS:` column of the log.
pub fn local_hostname() -> String {
    // Safety: gethostname writes at most `buf.len()` bytes into `buf`.
    #[cfg(unix)]
    {
        let mut buf = [0u8; 256];
        let ret = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
        if ret == 0 {
            let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
            if let Ok(name) = std::str::from_utf8(&buf[..end]) {
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
    }

    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".into())
}
