//! Search use case.
//!
//! Opens a search by id: a valid cached envelope is authoritative and is
//! returned without touching the network; otherwise a new session is
//! streamed from the backend.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use seeker_core::history::{HistoryEntry, HistoryRepository};
use seeker_core::result::{ResultCache, ResultEnvelope};
use seeker_core::session::{SearchIdentity, SearchSession, SessionReport, SessionSink};
use seeker_interaction::{AnalysisClient, StreamReader};
use tokio_util::sync::CancellationToken;

/// What the caller asked for.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    /// Id to open. `None` starts a fresh search under a generated id.
    pub search_id: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_id: None,
        }
    }

    pub fn with_search_id(mut self, search_id: impl Into<String>) -> Self {
        self.search_id = Some(search_id.into());
        self
    }
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// Served from the result cache; no request was made.
    Cached {
        search_id: String,
        envelope: ResultEnvelope,
    },
    /// Streamed from the backend.
    Streamed(SessionReport),
}

impl SearchOutcome {
    pub fn search_id(&self) -> &str {
        match self {
            SearchOutcome::Cached { search_id, .. } => search_id,
            SearchOutcome::Streamed(report) => &report.search_id,
        }
    }
}

pub struct SearchUseCase {
    cache: Arc<dyn ResultCache>,
    history: Arc<dyn HistoryRepository>,
    client: AnalysisClient,
    reader: StreamReader,
}

impl SearchUseCase {
    pub fn new(
        cache: Arc<dyn ResultCache>,
        history: Arc<dyn HistoryRepository>,
        client: AnalysisClient,
    ) -> Self {
        Self {
            cache,
            history,
            client,
            reader: StreamReader::new(),
        }
    }

    pub fn with_reader(mut self, reader: StreamReader) -> Self {
        self.reader = reader;
        self
    }

    /// Loads a cached envelope without falling back to the network.
    pub fn cached(&self, search_id: &str) -> Result<Option<ResultEnvelope>> {
        self.cache
            .load(search_id)
            .with_context(|| format!("Failed to read cached result '{}'", search_id))
    }

    /// Runs a search.
    ///
    /// A cache hit promotes the search in the history ledger. A streamed
    /// search is always finalized (and therefore persisted) before this
    /// returns, including when the transport fails.
    pub async fn search(
        &self,
        request: SearchRequest,
        sink: Arc<dyn SessionSink>,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome> {
        if let Some(search_id) = request.search_id.as_deref() {
            if let Some(envelope) = self.cached(search_id)? {
                tracing::info!(search_id, "Serving search from cache");
                self.history
                    .append(
                        HistoryEntry::new(search_id, &envelope.query)
                            .with_description(envelope.results.headline()),
                    )
                    .context("Failed to record search history")?;
                return Ok(SearchOutcome::Cached {
                    search_id: search_id.to_string(),
                    envelope,
                });
            }
        }

        let identity = match request.search_id {
            Some(id) => SearchIdentity::new(id),
            None => SearchIdentity::generate(),
        };
        let mut session = SearchSession::new(
            request.query,
            identity,
            self.cache.clone(),
            self.history.clone(),
            sink,
        );

        let report = self
            .client
            .run(&mut session, &self.reader, cancel)
            .await
            .context("Analysis stream failed")?
            .ok_or_else(|| anyhow!("Search session finished without a report"))?;

        Ok(SearchOutcome::Streamed(report))
    }
}
