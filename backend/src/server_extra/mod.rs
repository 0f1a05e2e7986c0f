//! HTTP surface: shared state, route table and handlers.

use axum::{Json, Router, routing::{get, post}};
use tower_http::cors::CorsLayer;

use crate::{config::{SearchConfig, YearRange}, solr_utils::solr_client::SolrClient};

pub mod download_results;
pub mod search_handlers;
pub mod stats_handlers;

#[derive(Debug, Clone)]
pub struct AppState {
    pub solr: SolrClient,
    pub last_10_years: YearRange,
}

impl AppState {
    pub fn new(config: &SearchConfig) -> Self {
        AppState { solr: SolrClient::new(config), last_10_years: config.last_10_years }
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Patent Search API", "status": "running" }))
}

pub fn build_router(state: AppState) -> Router {
    use common::search_query::EntityKind;
    use search_handlers::{build_entity_route, search_entity_route};

    Router::new()
        .route("/", get(root))
        .route("/search/patent", post(search_handlers::search_by_patent))
        .route("/search/examiner", search_entity_route(EntityKind::Examiner))
        .route("/search/prosecutor", search_entity_route(EntityKind::Prosecutor))
        .route("/search/attorney", search_entity_route(EntityKind::Attorney))
        .route("/search/lawfirm", search_entity_route(EntityKind::Lawfirm))
        .route("/search/gau", search_entity_route(EntityKind::Gau))
        .route("/build/patent-query", post(search_handlers::build_patent_query))
        .route("/build/examiner-query", build_entity_route(EntityKind::Examiner))
        .route("/build/prosecutor-query", build_entity_route(EntityKind::Prosecutor))
        .route("/build/attorney-query", build_entity_route(EntityKind::Attorney))
        .route("/build/lawfirm-query", build_entity_route(EntityKind::Lawfirm))
        .route("/build/gau-query", build_entity_route(EntityKind::Gau))
        .route("/build/advanced-query", post(search_handlers::build_advanced_query))
        .route("/execute-query", post(search_handlers::execute_query))
        .route("/stats/total", get(stats_handlers::total_stats))
        .route("/stats/by-date-range", post(stats_handlers::stats_by_date_range))
        .route("/stats/examiners-by-date", post(stats_handlers::examiner_stats_by_date))
        .route("/download/json", post(download_results::download_json))
        .route("/download/excel", post(download_results::download_excel))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
