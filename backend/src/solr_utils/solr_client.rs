use std::time::Duration;

use crate::{api::search::search_solr::QuerySpec, config::SearchConfig, error::TransportError};

/// Which timeout a request runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    /// Point lookups and flat document queries.
    Lookup,
    /// Zero-row faceted aggregations.
    Aggregation,
}

#[derive(Debug, Clone)]
pub struct SolrClient {
    pub(crate) http: reqwest::Client,
    select_url: String,
    lookup_timeout: Duration,
    aggregation_timeout: Duration,
}

impl SolrClient {
    pub fn new(config: &SearchConfig) -> Self {
        SolrClient {
            http: reqwest::Client::new(),
            select_url: config.solr_select_url(),
            lookup_timeout: config.lookup_timeout,
            aggregation_timeout: config.aggregation_timeout,
        }
    }

    pub fn select_url(&self) -> &str {
        &self.select_url
    }

    pub fn timeout_for(&self, class: QueryClass) -> Duration {
        match class {
            QueryClass::Lookup => self.lookup_timeout,
            QueryClass::Aggregation => self.aggregation_timeout,
        }
    }

    /// The URL `select` would request for this spec.
    pub fn preview_url(&self, spec: &QuerySpec) -> Result<String, TransportError> {
        let params = spec.to_params()?;
        let url = reqwest::Url::parse_with_params(
            &self.select_url,
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
        .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", self.select_url)))?;
        Ok(url.to_string())
    }

    /// Only URLs aimed at the configured select handler may be replayed.
    pub fn is_select_url(&self, url: &str) -> bool {
        match url.strip_prefix(self.select_url.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('?'),
            None => false,
        }
    }
}
