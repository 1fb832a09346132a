//! Wiring of the local stores and clients shared by all commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use seeker_application::{HistoryUseCase, SearchUseCase};
use seeker_core::auth::TokenStore;
use seeker_core::config::ClientConfig;
use seeker_infrastructure::{
    ConfigService, JsonHistoryRepository, JsonRememberMeStore, JsonResultCache, JsonTokenStore,
    SeekerPaths,
};
use seeker_interaction::{AnalysisClient, ApiClient};

pub struct AppContext {
    pub paths: SeekerPaths,
    pub config_service: ConfigService,
    pub config: ClientConfig,
    pub cache: Arc<JsonResultCache>,
    pub history: Arc<JsonHistoryRepository>,
    pub tokens: Arc<JsonTokenStore>,
    pub remember: Arc<JsonRememberMeStore>,
}

impl AppContext {
    pub fn open(home: Option<&Path>) -> Result<Self> {
        let paths = SeekerPaths::new(home);
        let config_service = ConfigService::new(&paths)?;
        let config = config_service
            .load()
            .context("Failed to load configuration")?;

        Ok(Self {
            cache: Arc::new(JsonResultCache::new(&paths)?),
            history: Arc::new(JsonHistoryRepository::new(&paths)?),
            tokens: Arc::new(JsonTokenStore::new(&paths)?),
            remember: Arc::new(JsonRememberMeStore::new(&paths)?),
            config_service,
            config,
            paths,
        })
    }

    pub fn logs_dir(&self) -> Option<PathBuf> {
        self.paths.logs_dir().ok()
    }

    pub fn api(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(self.config.clone(), self.tokens.clone())?)
    }

    pub fn search_usecase(&self) -> Result<SearchUseCase> {
        let token = self.tokens.load()?;
        let client = AnalysisClient::new(&self.config)?.with_token(token);
        Ok(SearchUseCase::new(
            self.cache.clone(),
            self.history.clone(),
            client,
        ))
    }

    pub fn history_usecase(&self) -> HistoryUseCase {
        HistoryUseCase::new(self.history.clone(), self.cache.clone())
    }
}
