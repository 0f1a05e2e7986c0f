//! Patent search facade: turns typed search requests into search-engine queries
//! and reshapes the engine's answers into flat JSON.

pub mod api;
pub mod config;
pub mod error;
pub mod error_log;
pub mod redact;
pub mod server_extra;
pub mod solr_utils;
