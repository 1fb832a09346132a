//! File-backed auth token and remember-me stores.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use seeker_core::Result;
use seeker_core::auth::{RememberMeStore, RememberedCredentials, TokenStore};

use crate::paths::SeekerPaths;
use crate::storage::AtomicJsonFile;

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Keeps the bearer token in `auth_token.json` (mode 600 on Unix).
pub struct JsonTokenStore {
    file: AtomicJsonFile<StoredToken>,
}

impl JsonTokenStore {
    pub fn new(paths: &SeekerPaths) -> Result<Self> {
        Ok(Self::with_file(paths.auth_token_file()?))
    }

    pub fn with_file(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path).restricted(),
        }
    }
}

impl TokenStore for JsonTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .file
            .load()?
            .map(|stored| stored.token)
            .filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        self.file.save(&StoredToken {
            token: token.to_string(),
        })?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        Ok(())
    }
}

/// Keeps remembered credentials in `remember_me.json` (mode 600 on Unix).
///
/// Entries older than the maximum age are deleted when read.
pub struct JsonRememberMeStore {
    file: AtomicJsonFile<RememberedCredentials>,
}

impl JsonRememberMeStore {
    pub fn new(paths: &SeekerPaths) -> Result<Self> {
        Ok(Self::with_file(paths.remember_me_file()?))
    }

    pub fn with_file(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path).restricted(),
        }
    }
}

impl RememberMeStore for JsonRememberMeStore {
    fn load(&self) -> Result<Option<RememberedCredentials>> {
        let Some(credentials) = self.file.load()? else {
            return Ok(None);
        };
        if credentials.is_stale() {
            tracing::info!("Discarding expired remembered credentials");
            self.file.remove()?;
            return Ok(None);
        }
        Ok(Some(credentials))
    }

    fn save(&self, credentials: &RememberedCredentials) -> Result<()> {
        self.file.save(credentials)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        Ok(())
    }
}
