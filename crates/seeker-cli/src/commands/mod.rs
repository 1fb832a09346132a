pub mod auth;
pub mod config;
pub mod history;
pub mod search;
pub mod show;
