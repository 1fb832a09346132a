#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use seeker_core::auth::TokenStore;
use seeker_core::history::{HistoryEntry, HistoryLedger, HistoryRepository};
use seeker_core::result::{ResultCache, ResultEnvelope, SearchResult};
use seeker_core::session::{NoopSink, SearchIdentity, SearchSession};

#[derive(Default)]
pub struct MemoryCache {
    pub entries: Mutex<HashMap<String, ResultEnvelope>>,
}

impl ResultCache for MemoryCache {
    fn save(&self, search_id: &str, query: &str, result: &SearchResult) -> seeker_core::Result<()> {
        self.entries.lock().unwrap().insert(
            search_id.to_string(),
            ResultEnvelope::new(query, result.clone()),
        );
        Ok(())
    }

    fn load(&self, search_id: &str) -> seeker_core::Result<Option<ResultEnvelope>> {
        Ok(self.entries.lock().unwrap().get(search_id).cloned())
    }

    fn remove(&self, search_id: &str) -> seeker_core::Result<()> {
        self.entries.lock().unwrap().remove(search_id);
        Ok(())
    }

    fn list_ids(&self) -> seeker_core::Result<Vec<String>> {
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryHistory {
    pub ledger: Mutex<HistoryLedger>,
}

impl HistoryRepository for MemoryHistory {
    fn list(&self) -> seeker_core::Result<Vec<HistoryEntry>> {
        Ok(self.ledger.lock().unwrap().entries().to_vec())
    }

    fn append(&self, entry: HistoryEntry) -> seeker_core::Result<()> {
        self.ledger.lock().unwrap().record(entry);
        Ok(())
    }

    fn remove(&self, id: &str) -> seeker_core::Result<()> {
        self.ledger.lock().unwrap().remove(id);
        Ok(())
    }

    fn clear(&self) -> seeker_core::Result<()> {
        self.ledger.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokens {
    pub token: Mutex<Option<String>>,
}

impl MemoryTokens {
    pub fn with(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokens {
    fn load(&self) -> seeker_core::Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn save(&self, token: &str) -> seeker_core::Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> seeker_core::Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

pub struct Fixture {
    pub cache: Arc<MemoryCache>,
    pub history: Arc<MemoryHistory>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(MemoryCache::default()),
            history: Arc::new(MemoryHistory::default()),
        }
    }

    pub fn session(&self, query: &str, provisional: &str) -> SearchSession {
        SearchSession::new(
            query,
            SearchIdentity::new(provisional),
            self.cache.clone(),
            self.history.clone(),
            Arc::new(NoopSink),
        )
    }
}

pub const COMPETITOR_LINE: &str = "data: {\"step\": \"Main Competitors\", \"card_index\": 0, \"card_content\": {\"product_name\": \"Acme\"}}\n";
