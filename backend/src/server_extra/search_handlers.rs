use axum::{Json, extract::State, routing::{MethodRouter, post}};
use common::{
    search_query::{AdvancedSearchRequest, EntityKind, EntitySearchRequest, ExecuteQueryRequest, PatentSearchRequest},
    search_result::{QueryPreview, SearchResultDocuments},
};

use crate::{api, error::Result, server_extra::AppState};

pub async fn search_by_patent(
    State(state): State<AppState>,
    Json(request): Json<PatentSearchRequest>,
) -> Result<Json<SearchResultDocuments>> {
    let documents = api::search::search_by_patent_ids(&state.solr, &request.patent_ids, state.last_10_years).await?;
    Ok(Json(documents))
}

/// POST handler for one entity kind; the kinds differ only in the field they match.
pub fn search_entity_route(kind: EntityKind) -> MethodRouter<AppState> {
    post(move |State(state): State<AppState>, Json(request): Json<EntitySearchRequest>| async move {
        tracing::info!("search by {}: {} names, {}", kind.as_str(), request.names.len(), request.search_type.as_str());
        let documents = api::search::search_by_entities(&state.solr, kind, request, state.last_10_years).await?;
        Result::Ok(Json(documents))
    })
}

pub async fn build_patent_query(
    State(state): State<AppState>,
    Json(request): Json<PatentSearchRequest>,
) -> Result<Json<QueryPreview>> {
    let preview = api::build_query::build_patent_query(&state.solr, &request.patent_ids, state.last_10_years)?;
    Ok(Json(preview))
}

pub fn build_entity_route(kind: EntityKind) -> MethodRouter<AppState> {
    post(move |State(state): State<AppState>, Json(request): Json<EntitySearchRequest>| async move {
        let preview = api::build_query::build_entity_query(&state.solr, kind, &request, state.last_10_years)?;
        Result::Ok(Json(preview))
    })
}

pub async fn build_advanced_query(
    State(state): State<AppState>,
    Json(request): Json<AdvancedSearchRequest>,
) -> Result<Json<QueryPreview>> {
    let preview = api::build_query::build_advanced_query(&state.solr, request, state.last_10_years)?;
    Ok(Json(preview))
}

pub async fn execute_query(
    State(state): State<AppState>,
    Json(request): Json<ExecuteQueryRequest>,
) -> Result<Json<SearchResultDocuments>> {
    let documents = api::search::execute_query(&state.solr, &request.solr_query_url).await?;
    Ok(Json(documents))
}
