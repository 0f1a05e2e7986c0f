use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    api::search::search_solr::QuerySpec,
    error::TransportError,
    solr_utils::solr_client::{QueryClass, SolrClient},
};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RawSolrResponse {
    #[serde(default)]
    pub response: Option<RawSolrDocuments>,
    #[serde(default)]
    pub facets: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawSolrDocuments {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RawFacetResult {
    #[serde(default)]
    pub buckets: Vec<RawFacetBucket>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawFacetBucket {
    pub val: serde_json::Value,
    pub count: u64,
    /// Sub-facets, keyed by the names used in the request.
    #[serde(flatten)]
    pub nested: serde_json::Map<String, serde_json::Value>,
}

/// The engine leaves a facet out entirely when nothing matched, so absence is not an error.
fn parse_facet<T: DeserializeOwned>(
    container: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Result<Option<T>, TransportError> {
    match container.get(name) {
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| TransportError::UnexpectedShape(format!("facet {name}: {e}"))),
        None => Ok(None),
    }
}

impl RawSolrResponse {
    pub fn facet(&self, name: &str) -> Result<RawFacetResult, TransportError> {
        let Some(facets) = &self.facets else {
            return Ok(RawFacetResult::default());
        };
        Ok(parse_facet(facets, name)?.unwrap_or_default())
    }

    pub fn documents(self) -> Result<RawSolrDocuments, TransportError> {
        self.response
            .ok_or_else(|| TransportError::UnexpectedShape("missing `response` section".to_string()))
    }
}

impl RawFacetBucket {
    pub fn sub_facet(&self, name: &str) -> Result<RawFacetResult, TransportError> {
        Ok(parse_facet(&self.nested, name)?.unwrap_or_default())
    }
}

#[derive(Debug)]
pub struct SolrResponse {
    /// Final URL of the request, kept for auditability.
    pub resolved_url: String,
    pub body: RawSolrResponse,
}

impl SolrClient {
    pub async fn select(&self, spec: &QuerySpec, class: QueryClass) -> Result<SolrResponse, TransportError> {
        let params = spec.to_params()?;
        self.get(self.select_url(), &params, self.timeout_for(class)).await
    }

    pub async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        timeout: Duration,
    ) -> Result<SolrResponse, TransportError> {
        let t0 = Instant::now();
        let response = self.http.get(url).query(params).timeout(timeout).send().await?;
        let status = response.status();
        let resolved_url = response.url().to_string();
        let response_txt = response.text().await?;
        let dt_ms = t0.elapsed().as_millis();
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!("search engine error: {} after {}ms", status, dt_ms);
            return Err(TransportError::Status { status: status.as_u16(), body: response_txt });
        }
        tracing::info!(
            "search engine response: status = {}, len = {}, url len = {}, {}ms",
            status,
            response_txt.len(),
            resolved_url.len(),
            dt_ms
        );
        let body: RawSolrResponse = serde_json::from_str(&response_txt)?;
        Ok(SolrResponse { resolved_url, body })
    }
}
