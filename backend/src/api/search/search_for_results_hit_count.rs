//! Collection-wide totals by disposition.

use common::search_result::TotalStats;

use crate::{
    api::search::search_solr::{FacetNode, QuerySpec, SOLR_MATCH_ALL},
    error::Result,
    solr_utils::{
        solr_client::{QueryClass, SolrClient},
        solr_select::RawSolrResponse,
    },
};

pub const DISPOSITION_FACET_NAME: &str = "dispositions";
pub const FIELD_DISPOSITION: &str = "disposal_type";
pub const DISPOSITION_ISSUED: &str = "iss";
pub const DISPOSITION_PENDING: &str = "pend";

/// Total count and the per-disposition split come back from a single zero-row request.
pub fn build_total_stats_query() -> QuerySpec {
    let mut spec = QuerySpec::new(SOLR_MATCH_ALL, 0);
    spec.facets.insert(
        DISPOSITION_FACET_NAME.to_string(),
        FacetNode::terms(FIELD_DISPOSITION, -1, "count desc"),
    );
    spec
}

pub fn normalize_total_stats(body: RawSolrResponse) -> Result<TotalStats> {
    let dispositions = body.facet(DISPOSITION_FACET_NAME)?;
    let count_of = |code: &str| {
        dispositions
            .buckets
            .iter()
            .filter(|b| b.val.as_str() == Some(code))
            .map(|b| b.count)
            .sum::<u64>()
    };
    let total_approved = count_of(DISPOSITION_ISSUED);
    let total_pending = count_of(DISPOSITION_PENDING);
    let total_patents = body.documents()?.num_found;

    Ok(TotalStats {
        total_patents,
        total_approved,
        total_pending,
        total_abandoned: total_patents.saturating_sub(total_approved).saturating_sub(total_pending),
    })
}

pub async fn total_stats(solr: &SolrClient) -> Result<TotalStats> {
    let response = solr.select(&build_total_stats_query(), QueryClass::Aggregation).await?;
    normalize_total_stats(response.body)
}
