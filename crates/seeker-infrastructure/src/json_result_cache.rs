//! File-backed result persistence cache.

use std::fs;
use std::path::PathBuf;

use seeker_core::Result;
use seeker_core::result::{ResultCache, ResultEnvelope, SearchResult};

use crate::paths::{SeekerPaths, decode_file_stem, encode_file_stem};
use crate::storage::{AtomicFileError, AtomicJsonFile};

/// One JSON file per search id under `results/`.
///
/// File names are the reversibly encoded id (see [`encode_file_stem`]), so
/// each id owns exactly one file.
pub struct JsonResultCache {
    dir: PathBuf,
}

impl JsonResultCache {
    pub fn new(paths: &SeekerPaths) -> Result<Self> {
        Ok(Self::with_dir(paths.results_dir()?))
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file(&self, search_id: &str) -> AtomicJsonFile<ResultEnvelope> {
        AtomicJsonFile::new(self.dir.join(format!("{}.json", encode_file_stem(search_id))))
    }
}

impl ResultCache for JsonResultCache {
    fn save(&self, search_id: &str, query: &str, result: &SearchResult) -> Result<()> {
        let envelope = ResultEnvelope::new(query, result.clone());
        self.file(search_id).save(&envelope)?;
        tracing::trace!(search_id, "Saved result envelope");
        Ok(())
    }

    fn load(&self, search_id: &str) -> Result<Option<ResultEnvelope>> {
        let file = self.file(search_id);
        let raw = match file.load_value() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(AtomicFileError::JsonError(e)) => {
                tracing::warn!(search_id, error = %e, "Ignoring unreadable cached result");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !ResultEnvelope::has_valid_shape(&raw) {
            tracing::warn!(search_id, "Ignoring cached result with unexpected shape");
            return Ok(None);
        }

        match serde_json::from_value(raw) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(e) => {
                tracing::warn!(search_id, error = %e, "Ignoring undecodable cached result");
                Ok(None)
            }
        }
    }

    fn remove(&self, search_id: &str) -> Result<()> {
        self.file(search_id).remove()?;
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match decode_file_stem(stem) {
                Some(id) => ids.push(id),
                None => tracing::debug!(file = %path.display(), "Skipping foreign file in results"),
            }
        }
        ids.sort();
        Ok(ids)
    }
}
