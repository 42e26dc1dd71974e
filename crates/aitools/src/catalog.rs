//! Wiring shared by every command: one API client, the auth store, and the
//! query client, all built from the same configuration.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::CatalogConfig;
use crate::prelude::{eprintln, *};
use crate::query::QueryClient;
use crate::session::{AuthStore, FileStorage};

pub struct Catalog {
    pub config: CatalogConfig,
    pub api: Arc<ApiClient>,
    pub auth: AuthStore,
    pub queries: QueryClient,
}

impl Catalog {
    /// Build the stores and restore any saved session
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let api = ApiClient::new(config.api_url.clone())
            .wrap_err_with(|| format!("Failed to create API client for {}", config.api_url))?;
        let api = Arc::new(api);

        let storage = Arc::new(FileStorage::new(&config.config_dir));
        let mut auth = AuthStore::new(Arc::clone(&api), storage);
        if let Some(user) = auth.restore() {
            log::info!("Logged in as {}", user.email);
        }

        let queries = QueryClient::new(Arc::clone(&api), config.stale_after)
            .with_cache_file(config.cache_file())
            .offline(config.offline);

        Ok(Self {
            config,
            api,
            auth,
            queries,
        })
    }

    pub fn from_global(global: &crate::Global) -> Result<Self> {
        let config = CatalogConfig::from_env()?.with_overrides(
            global.api_url.clone(),
            global.stale_secs,
            global.offline,
        );

        if global.verbose {
            eprintln!("API: {}", config.api_url);
            if config.offline {
                eprintln!("Offline mode: answering from demo data");
            }
        }

        Self::new(config)
    }

    /// End the session and drop admin results cached under it
    pub fn logout(&mut self) -> Result<()> {
        self.auth.logout()?;
        self.queries.forget_session();
        Ok(())
    }

    /// Persist the query cache. Failures are logged; they never fail a command.
    pub fn finish(mut self) {
        if let Err(e) = self.queries.save() {
            log::warn!("Failed to save query cache: {e}");
        }
    }
}
