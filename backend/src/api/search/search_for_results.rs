//! Search endpoint for result lists.

use common::{
    search_query::{EntitySearchRequest, EntityKind, SearchType},
    search_result::SearchResultDocuments,
};

use crate::{
    api::search::search_solr::{PatentIdStyle, SearchCriteria, build_query_spec},
    config::YearRange,
    error::{Result, SearchError},
    solr_utils::{
        solr_client::{QueryClass, SolrClient},
        solr_select::SolrResponse,
    },
};

/// Hit count and documents are passed through untouched, next to the URL that produced them.
pub fn normalize_documents(response: SolrResponse, search_type: Option<SearchType>) -> Result<SearchResultDocuments> {
    let documents = response.body.documents()?;
    Ok(SearchResultDocuments {
        solr_query_url: response.resolved_url,
        search_type,
        total_found: documents.num_found,
        results: documents.docs,
    })
}

pub async fn search_for_results(
    solr: &SolrClient,
    criteria: &SearchCriteria,
    last_10_years: YearRange,
) -> Result<SearchResultDocuments> {
    let spec = build_query_spec(criteria, last_10_years)?;
    let search_type = match criteria {
        SearchCriteria::NamedEntitySet { search_type, .. } => Some(*search_type),
        _ => None,
    };
    let response = solr.select(&spec, QueryClass::Lookup).await?;
    normalize_documents(response, search_type)
}

pub async fn search_by_patent_ids(
    solr: &SolrClient,
    patent_ids: &[String],
    last_10_years: YearRange,
) -> Result<SearchResultDocuments> {
    let criteria = SearchCriteria::patent_ids(patent_ids, PatentIdStyle::Grouped)?;
    search_for_results(solr, &criteria, last_10_years).await
}

pub async fn search_by_entities(
    solr: &SolrClient,
    kind: EntityKind,
    request: EntitySearchRequest,
    last_10_years: YearRange,
) -> Result<SearchResultDocuments> {
    let criteria = SearchCriteria::entity_request(kind, &request)?;
    search_for_results(solr, &criteria, last_10_years).await
}

/// Replays a URL previously returned by one of the query-preview endpoints.
pub async fn execute_query(solr: &SolrClient, solr_query_url: &str) -> Result<SearchResultDocuments> {
    let solr_query_url = solr_query_url.trim();
    if !solr.is_select_url(solr_query_url) {
        return Err(SearchError::Validation(
            "solr_query_url must target the configured search engine".to_string(),
        ));
    }
    let response = solr.get(solr_query_url, &[], solr.timeout_for(QueryClass::Lookup)).await?;
    normalize_documents(response, None)
}
