//! Solr query builders for search requests.
//!
//! Everything here is pure: a [`SearchCriteria`] goes in, a [`QuerySpec`] comes out,
//! and nothing touches the network.

use std::collections::{BTreeMap, HashSet};

use common::{
    search_const::LATEST_APPROVED_FIXED_ROWS,
    search_query::{AdvancedFilter, EntityKind, EntitySearchRequest, FilterOperator, SearchType, SortOption, SortOrder},
};
use serde::Serialize;

use crate::{
    api::search::search_facets::{DateRangeStat, build_stats_query},
    config::YearRange,
    error::{Result, SearchError, TransportError},
};

pub const SOLR_MATCH_ALL: &str = "*:*";
pub const FIELD_ID: &str = "id";
pub const FIELD_EXAMINER: &str = "examiner";
pub const FIELD_ATTORNEY_NAMES: &str = "all_attorney_names";
pub const FIELD_LAW_FIRM: &str = "law_firm";
pub const FIELD_GAU: &str = "gau";
pub const FIELD_APP_DATE_YEAR: &str = "app_date_year";
pub const SORT_APP_DATE_DESC: &str = "app_date desc";
pub const FILTER_ISSUED: &str = "disposal_type:iss";

/// Parameters of one request to the engine's select handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySpec {
    pub q: String,
    pub filter_queries: Vec<String>,
    pub rows: u32,
    pub sort: Option<String>,
    pub facets: BTreeMap<String, FacetNode>,
}

impl QuerySpec {
    pub fn new(q: impl Into<String>, rows: u32) -> Self {
        QuerySpec { q: q.into(), rows, ..Default::default() }
    }

    /// Flattens the query into repeatable query parameters, `fq` once per filter.
    pub fn to_params(&self) -> std::result::Result<Vec<(String, String)>, TransportError> {
        let mut params = vec![("q".to_string(), self.q.clone())];
        for fq in &self.filter_queries {
            params.push(("fq".to_string(), fq.clone()));
        }
        params.push(("rows".to_string(), self.rows.to_string()));
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params.push(("wt".to_string(), "json".to_string()));
        if !self.facets.is_empty() {
            let facets = serde_json::to_string(&self.facets)
                .map_err(|e| TransportError::RequestEncoding(format!("json.facet: {e}")))?;
            params.push(("json.facet".to_string(), facets));
        }
        Ok(params)
    }
}

/// A terms facet in the engine's JSON facet language, possibly with sub-facets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetNode {
    #[serde(rename = "type")]
    pub facet_type: &'static str,
    pub field: String,
    /// `-1` means unlimited.
    pub limit: i64,
    pub sort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mincount: Option<u64>,
    #[serde(rename = "facet", skip_serializing_if = "BTreeMap::is_empty")]
    pub nested_facets: BTreeMap<String, FacetNode>,
}

impl FacetNode {
    pub fn terms(field: impl Into<String>, limit: i64, sort: impl Into<String>) -> Self {
        FacetNode {
            facet_type: "terms",
            field: field.into(),
            limit,
            sort: sort.into(),
            mincount: None,
            nested_facets: BTreeMap::new(),
        }
    }

    pub fn with_mincount(mut self, mincount: u64) -> Self {
        self.mincount = Some(mincount);
        self
    }

    pub fn with_nested(mut self, name: impl Into<String>, node: FacetNode) -> Self {
        self.nested_facets.insert(name.into(), node);
        self
    }
}

/// How a multi-id patent lookup is written.
///
/// The search endpoint groups bare ids under one field, the query preview repeats
/// the quoted field per id. Both are accepted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatentIdStyle {
    /// `id:(A OR B)`
    Grouped,
    /// `id:"A" OR id:"B"`
    FieldRepeated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchCriteria {
    PatentIdSet {
        ids: Vec<String>,
        style: PatentIdStyle,
    },
    NamedEntitySet {
        kind: EntityKind,
        names: Vec<String>,
        search_type: SearchType,
        limit: u32,
        sort: Option<SortOption>,
    },
    DateRangeStat(DateRangeStat),
    AdvancedFilterSet {
        filters: Vec<AdvancedFilter>,
        limit: u32,
        sort: Option<SortOption>,
    },
}

impl SearchCriteria {
    pub fn patent_ids(ids: &[String], style: PatentIdStyle) -> Result<Self> {
        let ids = normalize_values(ids, false);
        if ids.is_empty() {
            return Err(SearchError::EmptyCriteria("patent IDs"));
        }
        Ok(SearchCriteria::PatentIdSet { ids, style })
    }

    pub fn named_entities(kind: EntityKind, names: &[String], search_type: SearchType, limit: u32) -> Result<Self> {
        let names = normalize_values(names, true);
        if names.is_empty() {
            return Err(SearchError::EmptyCriteria(empty_label(kind)));
        }
        Ok(SearchCriteria::NamedEntitySet { kind, names, search_type, limit, sort: None })
    }

    /// Named-entity criteria from a request body, including its optional sort override.
    pub fn entity_request(kind: EntityKind, request: &EntitySearchRequest) -> Result<Self> {
        let mut criteria = Self::named_entities(kind, &request.names, request.search_type, request.limit)?;
        if let (SearchCriteria::NamedEntitySet { sort, .. }, Some(raw)) = (&mut criteria, &request.sort) {
            *sort = Some(parse_sort(raw)?);
        }
        Ok(criteria)
    }

    pub fn advanced(filters: Vec<AdvancedFilter>, limit: u32, sort: Option<SortOption>) -> Result<Self> {
        if filters.is_empty() {
            return Err(SearchError::EmptyCriteria("filters"));
        }
        Ok(SearchCriteria::AdvancedFilterSet { filters, limit, sort })
    }

    /// The trimmed, de-duplicated values the query was built from.
    pub fn normalized_values(&self) -> Vec<String> {
        match self {
            SearchCriteria::PatentIdSet { ids, .. } => ids.clone(),
            SearchCriteria::NamedEntitySet { names, .. } => names.clone(),
            SearchCriteria::DateRangeStat(stat) => vec![stat.stat_type.label().to_string()],
            SearchCriteria::AdvancedFilterSet { filters, .. } => {
                filters.iter().map(|f| f.field.trim().to_string()).collect()
            }
        }
    }
}

fn empty_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Examiner => "examiner names",
        EntityKind::Prosecutor => "prosecutor names",
        EntityKind::Attorney => "attorney names",
        EntityKind::Lawfirm => "law firm names",
        EntityKind::Gau => "GAU codes",
    }
}

/// Engine field an entity kind is matched against.
pub fn entity_field(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Examiner => FIELD_EXAMINER,
        EntityKind::Prosecutor | EntityKind::Attorney => FIELD_ATTORNEY_NAMES,
        EntityKind::Lawfirm => FIELD_LAW_FIRM,
        EntityKind::Gau => FIELD_GAU,
    }
}

/// Trims, optionally lower-cases, drops empties and repeated values. Input order is kept.
pub fn normalize_values(values: &[String], lowercase: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let value = if lowercase { value.to_lowercase() } else { value.to_string() };
        if seen.insert(value.clone()) {
            result.push(value);
        }
    }
    result
}

pub fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Backslash-escapes query syntax characters so the value is matched as one bare term.
pub fn escape_term(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_whitespace() || "+-&|!(){}[]^\"~*?:\\/".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn build_patent_clause(ids: &[String], style: PatentIdStyle) -> String {
    match (ids, style) {
        ([single], PatentIdStyle::Grouped) => format!("{FIELD_ID}:{}", escape_term(single)),
        (_, PatentIdStyle::Grouped) => {
            let joined = ids.iter().map(|id| escape_term(id)).collect::<Vec<_>>().join(" OR ");
            format!("{FIELD_ID}:({joined})")
        }
        (_, PatentIdStyle::FieldRepeated) => {
            ids.iter().map(|id| format!("{FIELD_ID}:{}", quote_value(id))).collect::<Vec<_>>().join(" OR ")
        }
    }
}

/// One quoted clause per name joined with `OR`; GAU codes are grouped under a single field.
pub fn build_entity_clause(kind: EntityKind, names: &[String]) -> String {
    let field = entity_field(kind);
    if kind == EntityKind::Gau {
        let joined = names.iter().map(|n| quote_value(n)).collect::<Vec<_>>().join(" OR ");
        return format!("{field}:({joined})");
    }
    names.iter().map(|n| format!("{field}:{}", quote_value(n))).collect::<Vec<_>>().join(" OR ")
}

pub fn apply_search_type(spec: &mut QuerySpec, search_type: SearchType, limit: u32, last_10_years: YearRange) {
    match search_type {
        SearchType::LatestFiled => {
            spec.sort = Some(SORT_APP_DATE_DESC.to_string());
            spec.rows = limit;
        }
        SearchType::LatestApproved => {
            spec.filter_queries.push(FILTER_ISSUED.to_string());
            spec.sort = Some(SORT_APP_DATE_DESC.to_string());
            spec.rows = limit;
        }
        SearchType::Count => {
            spec.rows = 0;
        }
        SearchType::Last10Years => {
            spec.filter_queries.push(format!(
                "{FIELD_APP_DATE_YEAR}:[{} TO {}]",
                last_10_years.from, last_10_years.to
            ));
            spec.sort = Some(SORT_APP_DATE_DESC.to_string());
            spec.rows = limit;
        }
        SearchType::Latest10Approved => {
            spec.filter_queries.push(FILTER_ISSUED.to_string());
            spec.sort = Some(SORT_APP_DATE_DESC.to_string());
            spec.rows = LATEST_APPROVED_FIXED_ROWS;
        }
    }
}

fn validate_field_name(field: &str) -> Result<&str> {
    let field = field.trim();
    let valid = !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if !valid {
        return Err(SearchError::Validation(format!("invalid field name: {field:?}")));
    }
    Ok(field)
}

fn validate_range_bound<'a>(bound: &'a str, raw: &str) -> Result<&'a str> {
    let bound = bound.trim();
    if bound.is_empty() || bound.chars().any(|c| c.is_whitespace() || "[]{}\"".contains(c)) {
        return Err(SearchError::Validation(format!("malformed range value: {raw:?}")));
    }
    Ok(bound)
}

/// Parses a `"<field> asc|desc"` sort string.
pub fn parse_sort(raw: &str) -> Result<SortOption> {
    let parts = raw.split_whitespace().collect::<Vec<_>>();
    let [field, order] = parts.as_slice() else {
        return Err(SearchError::Validation(format!("sort must be \"<field> asc|desc\", got {raw:?}")));
    };
    let order = match order.to_ascii_lowercase().as_str() {
        "asc" => SortOrder::Asc,
        "desc" => SortOrder::Desc,
        _ => return Err(SearchError::Validation(format!("sort order must be asc or desc, got {order:?}"))),
    };
    Ok(SortOption { field: validate_field_name(field)?.to_string(), order })
}

fn render_sort(sort: &SortOption) -> Result<String> {
    let field = validate_field_name(&sort.field)?;
    Ok(format!("{field} {}", sort.order.as_str()))
}

/// Renders one advanced filter as a filter-query clause.
pub fn build_advanced_filter(filter: &AdvancedFilter) -> Result<String> {
    let field = validate_field_name(&filter.field)?;
    let value = filter.value.trim();
    if value.is_empty() {
        return Err(SearchError::Validation(format!("empty value for field {field}")));
    }
    let clause = match filter.operator {
        FilterOperator::Equals => format!("{field}:{}", quote_value(value)),
        FilterOperator::Contains => format!("{field}:*{}*", escape_term(value)),
        FilterOperator::StartsWith => format!("{field}:{}*", escape_term(value)),
        FilterOperator::Range => {
            let parts = value.split('-').collect::<Vec<_>>();
            let [start, end] = parts.as_slice() else {
                return Err(SearchError::Validation(format!(
                    "range value must be \"start-end\", got {value:?}"
                )));
            };
            let start = validate_range_bound(start, value)?;
            let end = validate_range_bound(end, value)?;
            format!("{field}:[{start} TO {end}]")
        }
    };
    Ok(clause)
}

pub fn build_query_spec(criteria: &SearchCriteria, last_10_years: YearRange) -> Result<QuerySpec> {
    match criteria {
        SearchCriteria::PatentIdSet { ids, style } => {
            let rows = u32::try_from(ids.len()).unwrap_or(u32::MAX);
            Ok(QuerySpec::new(build_patent_clause(ids, *style), rows))
        }
        SearchCriteria::NamedEntitySet { kind, names, search_type, limit, sort } => {
            let mut spec = QuerySpec::new(build_entity_clause(*kind, names), *limit);
            apply_search_type(&mut spec, *search_type, *limit, last_10_years);
            if let Some(sort) = sort {
                spec.sort = Some(render_sort(sort)?);
            }
            Ok(spec)
        }
        SearchCriteria::DateRangeStat(stat) => Ok(build_stats_query(stat)),
        SearchCriteria::AdvancedFilterSet { filters, limit, sort } => {
            let mut spec = QuerySpec::new(SOLR_MATCH_ALL, *limit);
            for filter in filters {
                spec.filter_queries.push(build_advanced_filter(filter)?);
            }
            if let Some(sort) = sort {
                spec.sort = Some(render_sort(sort)?);
            }
            Ok(spec)
        }
    }
}
