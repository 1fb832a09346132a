//! File-backed search history ledger.

use std::path::PathBuf;

use seeker_core::Result;
use seeker_core::history::{HistoryEntry, HistoryLedger, HistoryRepository};

use crate::paths::SeekerPaths;
use crate::storage::{AtomicFileError, AtomicJsonFile};

/// Stores the ledger as a JSON array in `history.json`.
///
/// Every mutation is a locked read-modify-write, so two sessions finishing at
/// once cannot drop each other's entry.
pub struct JsonHistoryRepository {
    file: AtomicJsonFile<Vec<HistoryEntry>>,
}

impl JsonHistoryRepository {
    pub fn new(paths: &SeekerPaths) -> Result<Self> {
        Ok(Self::with_file(paths.history_file()?))
    }

    pub fn with_file(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: Fn(&mut HistoryLedger),
    {
        let outcome = self.file.update(Vec::new(), |entries| {
            let mut ledger = HistoryLedger::from_entries(std::mem::take(entries));
            f(&mut ledger);
            *entries = ledger.into_entries();
            Ok(())
        });

        match outcome {
            Ok(()) => Ok(()),
            Err(AtomicFileError::JsonError(e)) => {
                tracing::warn!(error = %e, "History ledger unreadable; starting a new one");
                let mut ledger = HistoryLedger::new();
                f(&mut ledger);
                self.file.save(&ledger.into_entries())?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl HistoryRepository for JsonHistoryRepository {
    fn list(&self) -> Result<Vec<HistoryEntry>> {
        match self.file.load() {
            Ok(entries) => Ok(HistoryLedger::from_entries(entries.unwrap_or_default()).into_entries()),
            Err(AtomicFileError::JsonError(e)) => {
                tracing::warn!(error = %e, "History ledger unreadable; treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn append(&self, entry: HistoryEntry) -> Result<()> {
        tracing::debug!(id = %entry.id, "Recording search history entry");
        self.mutate(|ledger| ledger.record(entry.clone()))
    }

    fn remove(&self, id: &str) -> Result<()> {
        self.mutate(|ledger| {
            ledger.remove(id);
        })
    }

    fn clear(&self) -> Result<()> {
        self.mutate(HistoryLedger::clear)
    }
}
