//! API operations behind the HTTP routes.

pub mod search;
pub mod build_query;
pub mod export;
