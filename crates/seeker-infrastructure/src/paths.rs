//! Unified path management for seeker files.
//!
//! Everything the client keeps on disk is resolved here so that storage
//! implementations never build paths on their own.

use std::path::{Path, PathBuf};

use seeker_core::SeekerError;

const APP_DIR: &str = "seeker";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for SeekerError {
    fn from(e: PathError) -> Self {
        SeekerError::config(e.to_string())
    }
}

/// Unified path management for seeker.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/seeker/            # Config directory
/// ├── config.toml              # Client configuration
/// └── logs/                    # Application logs
///     └── seeker.log.YYYY-MM-DD
///
/// ~/.local/share/seeker/       # Data directory ("browser-local" storage)
/// ├── results/<search_id>.json # Result envelopes
/// ├── history.json             # Search history ledger
/// ├── auth_token.json          # Bearer token
/// └── remember_me.json         # Remembered credentials
/// ```
///
/// With a base directory (tests, `--data-dir`), both roots collapse into it.
#[derive(Debug, Clone, Default)]
pub struct SeekerPaths {
    base: Option<PathBuf>,
}

impl SeekerPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the seeker configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the seeker data directory.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    pub fn results_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("results"))
    }

    pub fn history_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("history.json"))
    }

    /// Returns the path to the bearer token file.
    ///
    /// # Security Note
    ///
    /// Written with 600 permissions on Unix.
    pub fn auth_token_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("auth_token.json"))
    }

    pub fn remember_me_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("remember_me.json"))
    }
}

/// Maps a search id onto a safe, reversible file stem.
///
/// `[A-Za-z0-9-]` pass through; every other byte, `_` included, becomes
/// `_XX` (uppercase hex of the UTF-8 byte). Distinct ids therefore never
/// share a file. The empty id is stored as `_`.
pub fn encode_file_stem(id: &str) -> String {
    if id.is_empty() {
        return "_".to_string();
    }
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{:02X}", byte));
        }
    }
    stem
}

/// Inverse of [`encode_file_stem`]. Returns `None` for stems it could not
/// have produced.
pub fn decode_file_stem(stem: &str) -> Option<String> {
    if stem == "_" {
        return Some(String::new());
    }
    let bytes = stem.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                let hex = stem.get(i + 1..i + 3)?;
                if !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F')) {
                    return None;
                }
                decoded.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            byte if byte.is_ascii_alphanumeric() || byte == b'-' => {
                decoded.push(byte);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(decoded).ok()
}
