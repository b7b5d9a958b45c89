// src/cache/manager.rs
use crate::cache::write_atomic;
use crate::fetcher::{ExportFetcher, FetchError};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("could not write cached export: {0}")]
    Io(#[from] io::Error),
}

/// Result of one freshness check. Failures are never fatal: the previous
/// file (if any) stays in place and the message is shown as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Fresh,
    Updated { bytes: usize },
    Failed(String),
}

impl RefreshOutcome {
    pub fn warning(&self) -> Option<String> {
        match self {
            RefreshOutcome::Failed(msg) => {
                Some(format!("Não foi possível atualizar o CSV: {msg}"))
            }
            _ => None,
        }
    }
}

pub struct CacheManager {
    path: PathBuf,
    max_age: Duration,
    fetcher: Box<dyn ExportFetcher>,
}

impl CacheManager {
    pub fn new(
        path: impl Into<PathBuf>,
        max_age: Duration,
        fetcher: impl ExportFetcher + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            max_age,
            fetcher: Box::new(fetcher),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time of the cached file, `None` while it does not exist.
    pub fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
    }

    /// Missing, or last written more than `max_age` before `now`.
    /// A modification time in the future counts as fresh.
    pub fn is_outdated(&self, now: SystemTime) -> bool {
        match self.modified() {
            None => true,
            Some(mtime) => now
                .duration_since(mtime)
                .map(|age| age > self.max_age)
                .unwrap_or(false),
        }
    }

    /// Fetch only when outdated. Safe to call on every render.
    pub fn ensure_fresh(&self, now: SystemTime) -> RefreshOutcome {
        if !self.is_outdated(now) {
            debug!(path = %self.path.display(), "cached export is fresh");
            return RefreshOutcome::Fresh;
        }
        self.refresh()
    }

    /// Manual trigger: one fetch attempt regardless of age.
    pub fn force_refresh(&self) -> RefreshOutcome {
        info!(path = %self.path.display(), "manual refresh requested");
        self.refresh()
    }

    fn refresh(&self) -> RefreshOutcome {
        match self.download() {
            Ok(bytes) => {
                info!(path = %self.path.display(), bytes, "cached export replaced");
                RefreshOutcome::Updated { bytes }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "refresh failed, keeping previous export");
                RefreshOutcome::Failed(e.to_string())
            }
        }
    }

    fn download(&self) -> Result<usize, CacheError> {
        let data = self.fetcher.fetch()?;
        write_atomic(&self.path, &data)?;
        Ok(data.len())
    }
}
