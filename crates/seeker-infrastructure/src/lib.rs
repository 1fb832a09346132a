pub mod config_service;
pub mod credential_store;
pub mod json_history_repository;
pub mod json_result_cache;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::credential_store::{JsonRememberMeStore, JsonTokenStore};
pub use crate::json_history_repository::JsonHistoryRepository;
pub use crate::json_result_cache::JsonResultCache;
pub use crate::paths::SeekerPaths;
