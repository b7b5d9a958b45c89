// src/app.rs
use crate::auth::SessionStore;
use crate::cache::CacheManager;
use crate::config::{Config, ConfigError};
use crate::data::TableCache;
use crate::fetcher::ExportFetcher;

/// Everything a request needs once configuration is valid.
pub struct Dashboard {
    pub config: Config,
    pub sessions: SessionStore,
    pub cache: CacheManager,
    pub tables: TableCache,
}

impl Dashboard {
    pub fn new(config: Config, fetcher: impl ExportFetcher + 'static) -> Self {
        let cache = CacheManager::new(config.csv_path.clone(), config.max_age, fetcher);
        let tables = TableCache::new(config.memo_ttl);

        Self {
            config,
            sessions: SessionStore::new(),
            cache,
            tables,
        }
    }
}

/// A misconfigured process keeps answering, but only with the config error.
pub enum App {
    Ready(Dashboard),
    Misconfigured(ConfigError),
}
