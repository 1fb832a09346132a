//! Search identity: provisional client id vs. authoritative server id.

use serde::{Deserialize, Serialize};

/// Identifies the search a session writes to.
///
/// A session starts with a client-generated provisional id. Once the backend
/// asserts an authoritative id, every later read of [`SearchIdentity::current`]
/// returns it and the provisional id is never used again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIdentity {
    provisional: String,
    authoritative: Option<String>,
}

impl SearchIdentity {
    pub fn new(provisional: impl Into<String>) -> Self {
        Self {
            provisional: provisional.into(),
            authoritative: None,
        }
    }

    /// Generates a fresh provisional id.
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    /// The id all persistence must use right now.
    pub fn current(&self) -> &str {
        self.authoritative.as_deref().unwrap_or(&self.provisional)
    }

    pub fn provisional(&self) -> &str {
        &self.provisional
    }

    pub fn authoritative(&self) -> Option<&str> {
        self.authoritative.as_deref()
    }

    pub fn is_authoritative(&self) -> bool {
        self.authoritative.is_some()
    }

    /// Adopts a server-asserted id. Returns `true` when the current id changed.
    pub fn adopt(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.authoritative.as_deref() == Some(id.as_str()) {
            return false;
        }
        let changed = self.current() != id;
        self.authoritative = Some(id);
        changed
    }
}
