use axum::{Json, body::Body, response::{IntoResponse, Response}};
use common::search_const::DEFAULT_EXPORT_FILENAME;
use tracing::info;

use crate::{api::export::{ExportFormat, export}, error::Result};

fn _download_results(payload: serde_json::Value, format: ExportFormat) -> Result<Response> {
    let data = export(&payload, &format)?;
    info!("Exporting results: {} bytes as {}", data.len(), format.extension());

    let headers: [(String, String); 2] = [
        ("Content-Type".to_string(), format.content_type().to_string()),
        (
            "Content-Disposition".to_string(),
            format!("attachment; filename=\"{}.{}\"", DEFAULT_EXPORT_FILENAME, format.extension()),
        ),
    ];
    Ok((headers, Body::from(data)).into_response())
}

pub async fn download_json(Json(payload): Json<serde_json::Value>) -> Result<Response> {
    _download_results(payload, ExportFormat::Json)
}

pub async fn download_excel(Json(payload): Json<serde_json::Value>) -> Result<Response> {
    _download_results(payload, ExportFormat::Excel)
}
