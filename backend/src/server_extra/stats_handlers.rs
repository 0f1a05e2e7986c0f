use axum::{Json, extract::State};
use common::{
    search_query::{ExaminerStatsByDateRequest, StatsByDateRangeRequest},
    search_result::{StatsByDateRangeResponse, TotalStats},
};

use crate::{api, error::Result, server_extra::AppState};

pub async fn total_stats(State(state): State<AppState>) -> Result<Json<TotalStats>> {
    Ok(Json(api::search::total_stats(&state.solr).await?))
}

pub async fn stats_by_date_range(
    State(state): State<AppState>,
    Json(request): Json<StatsByDateRangeRequest>,
) -> Result<Json<StatsByDateRangeResponse>> {
    Ok(Json(api::search::stats_by_date_range(&state.solr, request).await?))
}

pub async fn examiner_stats_by_date(
    State(state): State<AppState>,
    Json(request): Json<ExaminerStatsByDateRequest>,
) -> Result<Json<StatsByDateRangeResponse>> {
    Ok(Json(api::search::examiner_stats_by_date(&state.solr, request).await?))
}
