//! Query previews: the URL a search would request, without sending it.

use common::{
    search_query::{AdvancedSearchRequest, EntityKind, EntitySearchRequest},
    search_result::QueryPreview,
};

use crate::{
    api::search::search_solr::{PatentIdStyle, SearchCriteria, build_query_spec},
    config::YearRange,
    error::Result,
    solr_utils::solr_client::SolrClient,
};

pub fn build_query_preview(
    solr: &SolrClient,
    criteria: &SearchCriteria,
    query_type: &str,
    last_10_years: YearRange,
) -> Result<QueryPreview> {
    let spec = build_query_spec(criteria, last_10_years)?;
    Ok(QueryPreview {
        solr_query_url: solr.preview_url(&spec)?,
        query_type: query_type.to_string(),
        normalized_values: criteria.normalized_values(),
    })
}

pub fn build_patent_query(solr: &SolrClient, patent_ids: &[String], last_10_years: YearRange) -> Result<QueryPreview> {
    let criteria = SearchCriteria::patent_ids(patent_ids, PatentIdStyle::FieldRepeated)?;
    build_query_preview(solr, &criteria, "patent", last_10_years)
}

pub fn build_entity_query(
    solr: &SolrClient,
    kind: EntityKind,
    request: &EntitySearchRequest,
    last_10_years: YearRange,
) -> Result<QueryPreview> {
    let criteria = SearchCriteria::entity_request(kind, request)?;
    build_query_preview(solr, &criteria, kind.as_str(), last_10_years)
}

pub fn build_advanced_query(
    solr: &SolrClient,
    request: AdvancedSearchRequest,
    last_10_years: YearRange,
) -> Result<QueryPreview> {
    let criteria = SearchCriteria::advanced(request.filters, request.limit, request.sort)?;
    build_query_preview(solr, &criteria, "advanced", last_10_years)
}
