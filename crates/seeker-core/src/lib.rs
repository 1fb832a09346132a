pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod result;
pub mod session;
pub mod strategy;

// Re-export common error type
pub use error::{Result, SeekerError};
