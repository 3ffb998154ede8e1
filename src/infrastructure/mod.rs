pub mod artifact_store;
pub mod config;
pub mod document;
pub mod storage;
