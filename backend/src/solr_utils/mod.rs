//! Search engine transport and raw response shapes.

pub mod solr_client;
pub mod solr_select;
