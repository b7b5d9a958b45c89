// src/data/memo.rs
use crate::data::{load_table, ListingsTable, LoadError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, warn};

struct MemoEntry {
    mtime: SystemTime,
    loaded_at: Instant,
    table: Arc<ListingsTable>,
}

/// A table handed to the view, plus a warning when it is a fallback.
#[derive(Clone)]
pub struct Loaded {
    pub table: Arc<ListingsTable>,
    pub warning: Option<String>,
}

/// Parsed exports keyed by (path, mtime). A new mtime always reparses; the
/// TTL only bounds how long an unchanged file is trusted.
/// One slot per path: the newest good table, kept as parse-failure fallback.
pub struct TableCache {
    ttl: Duration,
    entries: Mutex<HashMap<PathBuf, MemoEntry>>,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MemoEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load(&self, path: &Path, mtime: SystemTime) -> Result<Loaded, LoadError> {
        self.load_at(path, mtime, Instant::now())
    }

    pub fn load_at(
        &self,
        path: &Path,
        mtime: SystemTime,
        now: Instant,
    ) -> Result<Loaded, LoadError> {
        let mut entries = self.lock();

        if let Some(entry) = entries.get(path) {
            let age = now.saturating_duration_since(entry.loaded_at);
            if entry.mtime == mtime && age < self.ttl {
                debug!(path = %path.display(), "table memo hit");
                return Ok(Loaded {
                    table: Arc::clone(&entry.table),
                    warning: None,
                });
            }
        }

        debug!(path = %path.display(), "table memo miss");
        match load_table(path) {
            Ok(table) => {
                let table = Arc::new(table);
                entries.insert(
                    path.to_path_buf(),
                    MemoEntry {
                        mtime,
                        loaded_at: now,
                        table: Arc::clone(&table),
                    },
                );
                Ok(Loaded {
                    table,
                    warning: None,
                })
            }
            Err(e) => match entries.get(path) {
                Some(previous) => {
                    warn!(path = %path.display(), error = %e, "parse failed, serving previous table");
                    Ok(Loaded {
                        table: Arc::clone(&previous.table),
                        warning: Some(format!(
                            "O CSV baixado não pôde ser lido ({e}); exibindo a versão anterior."
                        )),
                    })
                }
                None => Err(e),
            },
        }
    }
}
