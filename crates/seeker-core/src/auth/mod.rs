//! Authentication credentials kept on the client.
//!
//! The bearer token and the optional "remember me" credentials are the only
//! auth state the client owns; everything else lives with the auth service.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Age in days after which remembered credentials are discarded.
pub const REMEMBER_ME_MAX_AGE_DAYS: i64 = 30;

/// Credentials saved by "remember me".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedCredentials {
    pub email: String,
    pub password: String,
    /// Unix epoch milliseconds of the save.
    pub timestamp: i64,
}

impl RememberedCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Whether the entry is older than [`REMEMBER_ME_MAX_AGE_DAYS`] at `now_millis`.
    pub fn is_stale_at(&self, now_millis: i64) -> bool {
        let max_age = chrono::Duration::days(REMEMBER_ME_MAX_AGE_DAYS).num_milliseconds();
        now_millis.saturating_sub(self.timestamp) > max_age
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(chrono::Utc::now().timestamp_millis())
    }
}

/// Storage of the opaque bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Storage of remembered login credentials.
///
/// `load` applies the staleness check: stale entries read as `None`.
pub trait RememberMeStore: Send + Sync {
    fn load(&self) -> Result<Option<RememberedCredentials>>;
    fn save(&self, credentials: &RememberedCredentials) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness_window() {
        let credentials = RememberedCredentials {
            email: "a@b.c".into(),
            password: "pw".into(),
            timestamp: 0,
        };
        let day = chrono::Duration::days(1).num_milliseconds();
        assert!(!credentials.is_stale_at(29 * day));
        assert!(!credentials.is_stale_at(30 * day));
        assert!(credentials.is_stale_at(30 * day + 1));
    }

    #[test]
    fn test_fresh_credentials_not_stale() {
        assert!(!RememberedCredentials::new("a@b.c", "pw").is_stale());
    }
}
