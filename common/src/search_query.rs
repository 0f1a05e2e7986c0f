//! Shared search request models and helpers.

use serde::{Deserialize, Serialize};

use crate::search_const::DEFAULT_LIMIT;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Selects the extra filter, sort and row-count behaviour of a named-entity search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SearchType {
    #[default]
    #[serde(rename = "latest_filed")]
    LatestFiled,
    #[serde(rename = "latest_approved")]
    LatestApproved,
    #[serde(rename = "count")]
    Count,
    #[serde(rename = "last_10_years")]
    Last10Years,
    #[serde(rename = "latest_10_approved")]
    Latest10Approved,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::LatestFiled => "latest_filed",
            SearchType::LatestApproved => "latest_approved",
            SearchType::Count => "count",
            SearchType::Last10Years => "last_10_years",
            SearchType::Latest10Approved => "latest_10_approved",
        }
    }
}

/// The kind of named entity a search is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Examiner,
    Prosecutor,
    Attorney,
    Lawfirm,
    Gau,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Examiner => "examiner",
            EntityKind::Prosecutor => "prosecutor",
            EntityKind::Attorney => "attorney",
            EntityKind::Lawfirm => "lawfirm",
            EntityKind::Gau => "gau",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentSearchRequest {
    pub patent_ids: Vec<String>,
}

/// Body shared by the examiner, prosecutor, attorney, law firm and GAU endpoints.
///
/// Each endpoint names its list differently (`examiners`, `lawfirms`, ...), all of
/// which land in `names`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySearchRequest {
    #[serde(
        alias = "examiners",
        alias = "prosecutors",
        alias = "attorneys",
        alias = "lawfirms",
        alias = "gaus"
    )]
    pub names: Vec<String>,
    #[serde(default)]
    pub search_type: SearchType,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// `"<field> asc|desc"`, overriding the sort the search type picks.
    #[serde(default)]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Grouping dimension of a date-range statistics request.
///
/// The labels double as output key names, so they are fixed here rather than
/// derived from the request string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    Examiner,
    Prosecutor,
    Lawfirm,
    Gau,
    Assignee,
    Usc,
    Entity,
    Action,
}

impl StatType {
    pub const ALL: [StatType; 8] = [
        StatType::Examiner,
        StatType::Prosecutor,
        StatType::Lawfirm,
        StatType::Gau,
        StatType::Assignee,
        StatType::Usc,
        StatType::Entity,
        StatType::Action,
    ];

    pub fn parse(value: &str) -> Option<StatType> {
        let value = value.trim();
        StatType::ALL.into_iter().find(|t| t.label() == value)
    }

    /// Key of the grouped value inside each output bucket.
    pub fn label(&self) -> &'static str {
        match self {
            StatType::Examiner => "examiner",
            StatType::Prosecutor => "prosecutor",
            StatType::Lawfirm => "lawfirm",
            StatType::Gau => "gau",
            StatType::Assignee => "assignee",
            StatType::Usc => "usc",
            StatType::Entity => "entity",
            StatType::Action => "action",
        }
    }

    /// Key of the output array.
    pub fn plural_label(&self) -> &'static str {
        match self {
            StatType::Examiner => "examiners",
            StatType::Prosecutor => "prosecutors",
            StatType::Lawfirm => "lawfirms",
            StatType::Gau => "gaus",
            StatType::Assignee => "assignees",
            StatType::Usc => "uscs",
            StatType::Entity => "entitys",
            StatType::Action => "actions",
        }
    }

    pub fn total_key(&self) -> &'static str {
        match self {
            StatType::Examiner => "total_examiners",
            StatType::Prosecutor => "total_prosecutors",
            StatType::Lawfirm => "total_lawfirms",
            StatType::Gau => "total_gaus",
            StatType::Assignee => "total_assignees",
            StatType::Usc => "total_uscs",
            StatType::Entity => "total_entitys",
            StatType::Action => "total_actions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsByDateRangeRequest {
    /// Kept as a string so that unknown types surface as a typed error instead of a decode failure.
    #[serde(rename = "type")]
    pub stat_type: String,
    pub from_date: String,
    pub to_date: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExaminerStatsByDateRequest {
    pub from_date: String,
    pub to_date: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl From<ExaminerStatsByDateRequest> for StatsByDateRangeRequest {
    fn from(request: ExaminerStatsByDateRequest) -> Self {
        StatsByDateRangeRequest {
            stat_type: StatType::Examiner.label().to_string(),
            from_date: request.from_date,
            to_date: request.to_date,
            limit: request.limit,
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    Contains,
    StartsWith,
    Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedFilter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOption {
    pub field: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSearchRequest {
    pub filters: Vec<AdvancedFilter>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort: Option<SortOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteQueryRequest {
    pub solr_query_url: String,
}
