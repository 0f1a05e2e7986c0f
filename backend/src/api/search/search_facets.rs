//! Date-range statistics: facet query construction and bucket flattening.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::{
    search_query::{ExaminerStatsByDateRequest, SortOrder, StatType, StatsByDateRangeRequest},
    search_result::{FacetCount, NormalizedBucket, StatsByDateRangeResponse, SubFacet},
};

use crate::{
    api::search::search_solr::{FacetNode, QuerySpec, SOLR_MATCH_ALL},
    error::{Result, SearchError, TransportError},
    solr_utils::{
        solr_client::{QueryClass, SolrClient},
        solr_select::RawFacetBucket,
    },
};

pub const STATS_FACET_NAME: &str = "groups";
pub const FIELD_APP_DATE: &str = "app_date";
/// Classification sub-buckets kept per group by the generic stats endpoint.
pub const CPC_BUCKET_LIMIT: i64 = 20;
/// No cap: examiner reports count every classification code.
pub const CPC_BUCKET_UNLIMITED: i64 = -1;

/// Engine field each statistics type groups on.
pub fn stat_type_field(stat_type: StatType) -> &'static str {
    match stat_type {
        StatType::Examiner => "examiner",
        StatType::Prosecutor => "all_attorney_names",
        StatType::Lawfirm => "law_firm",
        StatType::Gau => "gau",
        StatType::Assignee => "assignee_last",
        StatType::Usc => "usc",
        StatType::Entity => "small_entity_indicator",
        StatType::Action => "th_all_action",
    }
}

pub fn sub_facet_field(sub_facet: SubFacet) -> &'static str {
    match sub_facet {
        SubFacet::Gau => "gau",
        SubFacet::Cpc => "cpc_classification",
    }
}

fn sub_facet_node(sub_facet: SubFacet, group_sort: &str, cpc_limit: i64) -> FacetNode {
    match sub_facet {
        SubFacet::Gau => FacetNode::terms(sub_facet_field(sub_facet), -1, group_sort),
        SubFacet::Cpc => FacetNode::terms(sub_facet_field(sub_facet), cpc_limit, "count desc").with_mincount(1),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateRangeStat {
    pub stat_type: StatType,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub limit: u32,
    pub sort_order: SortOrder,
    /// Bucket limit of the nested `cpcs` facet, `-1` for all.
    pub cpc_limit: i64,
    /// Whether the response echoes the `type` key.
    pub echo_type: bool,
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| SearchError::Validation(format!("{name} must be YYYY-MM-DD, got {value:?}")))
}

impl DateRangeStat {
    pub fn from_request(request: &StatsByDateRangeRequest) -> Result<Self> {
        let stat_type = StatType::parse(&request.stat_type)
            .ok_or_else(|| SearchError::UnsupportedStatType(request.stat_type.clone()))?;
        let from_date = parse_date("from_date", &request.from_date)?;
        let to_date = parse_date("to_date", &request.to_date)?;
        if from_date > to_date {
            return Err(SearchError::Validation(format!(
                "from_date {from_date} is after to_date {to_date}"
            )));
        }
        if request.limit == 0 {
            return Err(SearchError::Validation("limit must be at least 1".to_string()));
        }
        Ok(DateRangeStat {
            stat_type,
            from_date,
            to_date,
            limit: request.limit,
            sort_order: request.sort_order,
            cpc_limit: CPC_BUCKET_LIMIT,
            echo_type: true,
        })
    }

    /// Examiner report: most active examiners first, every CPC counted, no `type` key.
    pub fn examiners_by_date(request: &ExaminerStatsByDateRequest) -> Result<Self> {
        let stat = Self::from_request(&StatsByDateRangeRequest::from(request.clone()))?;
        Ok(DateRangeStat { cpc_limit: CPC_BUCKET_UNLIMITED, echo_type: false, ..stat })
    }
}

/// Zero-row query whose only output is the two-level facet tree.
pub fn build_stats_query(stat: &DateRangeStat) -> QuerySpec {
    let mut spec = QuerySpec::new(SOLR_MATCH_ALL, 0);
    spec.filter_queries.push(format!(
        "{FIELD_APP_DATE}:[{}T00:00:00Z TO {}T23:59:59Z]",
        stat.from_date.format("%Y-%m-%d"),
        stat.to_date.format("%Y-%m-%d"),
    ));
    let sort = format!("count {}", stat.sort_order.as_str());
    let mut groups = FacetNode::terms(stat_type_field(stat.stat_type), i64::from(stat.limit), sort.clone());
    for sub_facet in SubFacet::ALL {
        groups = groups.with_nested(sub_facet.name(), sub_facet_node(sub_facet, &sort, stat.cpc_limit));
    }
    spec.facets.insert(STATS_FACET_NAME.to_string(), groups);
    spec
}

/// Flattens top-level buckets. Sub-facet counts come from the bucket lists, not from the engine.
pub fn normalize_facet_buckets(buckets: Vec<RawFacetBucket>) -> std::result::Result<Vec<NormalizedBucket>, TransportError> {
    let mut result = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let mut nested = BTreeMap::new();
        for sub_facet in SubFacet::ALL {
            let items = bucket
                .sub_facet(sub_facet.name())?
                .buckets
                .into_iter()
                .map(|b| FacetCount { value: b.val, count: b.count })
                .collect::<Vec<_>>();
            nested.insert(sub_facet, items);
        }
        result.push(NormalizedBucket { value: bucket.val, count: bucket.count, nested });
    }
    Ok(result)
}

async fn run_stats(
    solr: &SolrClient,
    stat: DateRangeStat,
    from_date: &str,
    to_date: &str,
) -> Result<StatsByDateRangeResponse> {
    let spec = build_stats_query(&stat);
    let response = solr.select(&spec, QueryClass::Aggregation).await?;
    let buckets = response.body.facet(STATS_FACET_NAME)?.buckets;
    let groups = normalize_facet_buckets(buckets)?;
    tracing::info!("stats by {}: {} groups", stat.stat_type.label(), groups.len());

    Ok(StatsByDateRangeResponse {
        stat_type: stat.stat_type,
        include_type: stat.echo_type,
        from_date: from_date.trim().to_string(),
        to_date: to_date.trim().to_string(),
        groups,
    })
}

pub async fn stats_by_date_range(solr: &SolrClient, request: StatsByDateRangeRequest) -> Result<StatsByDateRangeResponse> {
    let stat = DateRangeStat::from_request(&request)?;
    run_stats(solr, stat, &request.from_date, &request.to_date).await
}

pub async fn examiner_stats_by_date(
    solr: &SolrClient,
    request: ExaminerStatsByDateRequest,
) -> Result<StatsByDateRangeResponse> {
    let stat = DateRangeStat::examiners_by_date(&request)?;
    run_stats(solr, stat, &request.from_date, &request.to_date).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(stat_type: &str, from: &str, to: &str) -> StatsByDateRangeRequest {
        StatsByDateRangeRequest {
            stat_type: stat_type.to_string(),
            from_date: from.to_string(),
            to_date: to.to_string(),
            limit: 15,
            sort_order: SortOrder::Asc,
        }
    }

    fn raw_buckets(value: serde_json::Value) -> Vec<RawFacetBucket> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn stats_query_is_aggregation_only() {
        let stat = DateRangeStat::from_request(&request("lawfirm", "2024-01-01", "2024-03-31")).unwrap();
        let spec = build_stats_query(&stat);
        assert_eq!(spec.q, "*:*");
        assert_eq!(spec.rows, 0);
        assert_eq!(spec.filter_queries, vec!["app_date:[2024-01-01T00:00:00Z TO 2024-03-31T23:59:59Z]"]);

        let facets = serde_json::to_value(&spec.facets).unwrap();
        assert_eq!(
            facets,
            json!({
                "groups": {
                    "type": "terms",
                    "field": "law_firm",
                    "limit": 15,
                    "sort": "count asc",
                    "facet": {
                        "cpcs": {
                            "type": "terms",
                            "field": "cpc_classification",
                            "limit": 20,
                            "sort": "count desc",
                            "mincount": 1
                        },
                        "gaus": {"type": "terms", "field": "gau", "limit": -1, "sort": "count asc"}
                    }
                }
            })
        );
    }

    #[test]
    fn examiner_report_counts_every_cpc() {
        let examiners = ExaminerStatsByDateRequest {
            from_date: "2024-01-01".to_string(),
            to_date: "2024-03-31".to_string(),
            limit: 30,
        };
        let stat = DateRangeStat::examiners_by_date(&examiners).unwrap();
        assert!(!stat.echo_type);
        let facets = serde_json::to_value(&build_stats_query(&stat).facets).unwrap();
        assert_eq!(
            facets,
            json!({
                "groups": {
                    "type": "terms",
                    "field": "examiner",
                    "limit": 30,
                    "sort": "count desc",
                    "facet": {
                        "cpcs": {
                            "type": "terms",
                            "field": "cpc_classification",
                            "limit": -1,
                            "sort": "count desc",
                            "mincount": 1
                        },
                        "gaus": {"type": "terms", "field": "gau", "limit": -1, "sort": "count desc"}
                    }
                }
            })
        );

        let generic = DateRangeStat::from_request(&request("examiner", "2024-01-01", "2024-03-31")).unwrap();
        assert!(generic.echo_type);
        assert_eq!(build_stats_query(&generic).facets[STATS_FACET_NAME].nested_facets["cpcs"].limit, 20);
    }

    #[test]
    fn every_stat_type_has_a_group_field() {
        for stat_type in StatType::ALL {
            let stat = DateRangeStat::from_request(&request(stat_type.label(), "2024-01-01", "2024-01-01")).unwrap();
            let spec = build_stats_query(&stat);
            assert_eq!(spec.facets[STATS_FACET_NAME].field, stat_type_field(stat_type));
        }
    }

    #[test]
    fn unknown_stat_type_is_unsupported() {
        let err = DateRangeStat::from_request(&request("inventor", "2024-01-01", "2024-02-01")).unwrap_err();
        assert!(matches!(err, SearchError::UnsupportedStatType(t) if t == "inventor"));
    }

    #[test]
    fn bad_dates_are_validation_errors() {
        for (from, to) in [("2024-13-01", "2024-12-01"), ("yesterday", "2024-01-01"), ("2024-05-01", "2024-04-01")] {
            let err = DateRangeStat::from_request(&request("examiner", from, to)).unwrap_err();
            assert!(matches!(err, SearchError::Validation(_)), "{from} {to}");
        }
        let mut zero = request("examiner", "2024-01-01", "2024-02-01");
        zero.limit = 0;
        assert!(matches!(DateRangeStat::from_request(&zero), Err(SearchError::Validation(_))));
    }

    #[test]
    fn flattens_nested_buckets() {
        let buckets = raw_buckets(json!([
            {
                "val": "jane doe",
                "count": 12,
                "gaus": {"buckets": [{"val": "2121", "count": 10}, {"val": "2122", "count": 2}]},
                "cpcs": {"buckets": [{"val": "H01M", "count": 12}]}
            }
        ]));
        let groups = normalize_facet_buckets(buckets).unwrap();
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.value, json!("jane doe"));
        assert_eq!(group.count, 12);
        assert_eq!(group.unique_count(SubFacet::Gau), 2);
        assert_eq!(group.unique_count(SubFacet::Cpc), 1);
        assert_eq!(group.items(SubFacet::Gau)[1], FacetCount { value: json!("2122"), count: 2 });
    }

    #[test]
    fn bucket_without_cpcs_has_zero_cpcs() {
        let buckets = raw_buckets(json!([
            {"val": 2121, "count": 3, "gaus": {"buckets": [{"val": 2121, "count": 3}]}}
        ]));
        let groups = normalize_facet_buckets(buckets).unwrap();
        assert_eq!(groups[0].unique_count(SubFacet::Cpc), 0);
        assert!(groups[0].items(SubFacet::Cpc).is_empty());

        let value = serde_json::to_value(StatsByDateRangeResponse {
            stat_type: StatType::Gau,
            include_type: true,
            from_date: "2024-01-01".to_string(),
            to_date: "2024-01-31".to_string(),
            groups,
        })
        .unwrap();
        assert_eq!(value["gaus"][0]["unique_cpc_count"], 0);
        assert_eq!(value["gaus"][0]["cpcs"], json!([]));
        assert_eq!(value["gaus"][0]["gau"], 2121);
    }

    #[test]
    fn reported_sub_facet_counts_are_ignored() {
        let buckets = raw_buckets(json!([
            {"val": "x", "count": 1, "numBuckets": 99, "gaus": {"numBuckets": 42, "buckets": []}}
        ]));
        let groups = normalize_facet_buckets(buckets).unwrap();
        assert_eq!(groups[0].unique_count(SubFacet::Gau), 0);
    }
}
