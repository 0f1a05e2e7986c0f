//! Common library exports shared between the API server and its clients.

extern crate serde;


pub mod search_query;
pub mod search_result;
pub mod search_const;
