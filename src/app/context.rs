use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{FreshetError, Result};
use crate::config::{catalog, CatalogEntry, Settings};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::forwarder::{Forwarder, ParallelForwarder};
use crate::notifier::{DiscordNotifier, Notifier};
use crate::store::SqliteStore;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub parallel_forwarder: ParallelForwarder,
    pub catalog: Vec<CatalogEntry>,
    pub settings: Settings,
}

impl AppContext {
    pub fn new(settings: Settings) -> Result<Self> {
        let db_path = match settings.db_path.clone() {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(store, settings)
    }

    pub fn in_memory(settings: Settings) -> Result<Self> {
        Self::with_store(Arc::new(SqliteStore::in_memory()?), settings)
    }

    fn with_store(store: Arc<SqliteStore>, settings: Settings) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(
            Duration::from_secs(settings.delivery.fetch_timeout_secs),
        ));
        let notifier: Arc<dyn Notifier + Send + Sync> =
            Arc::new(DiscordNotifier::new(settings.bot_token.clone()));

        Ok(Self::with_components(
            store,
            fetcher,
            notifier,
            catalog::default_catalog(),
            settings,
        ))
    }

    /// Assemble a context from pre-built components; tests substitute
    /// scripted fetchers and notifiers here.
    pub fn with_components(
        store: Arc<SqliteStore>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        catalog: Vec<CatalogEntry>,
        settings: Settings,
    ) -> Self {
        let forwarder = Arc::new(Forwarder::new(
            fetcher.clone(),
            notifier,
            settings.delivery.clone(),
        ));
        let parallel_forwarder =
            ParallelForwarder::with_bound(forwarder, settings.delivery.max_in_flight);

        Self {
            store,
            fetcher,
            parallel_forwarder,
            catalog,
            settings,
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| FreshetError::Config("Could not find data directory".into()))?;
        let freshet_dir = data_dir.join("freshet");
        std::fs::create_dir_all(&freshet_dir)?;
        Ok(freshet_dir.join("freshet.db"))
    }
}
