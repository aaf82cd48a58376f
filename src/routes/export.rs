use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{DiaryEntry, ScheduleEntry};
use crate::AppState;

/// Full dump of both collections. Also the input format of `almanac import`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub exported_at: String,
    pub entries: Vec<DiaryEntry>,
    pub schedule: Vec<ScheduleEntry>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/export", get(export_data))
}

async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let export = ExportData {
        exported_at: chrono::Utc::now().to_rfc3339(),
        entries: DiaryEntry::all(&state.db).await?,
        schedule: ScheduleEntry::all(&state.db).await?,
    };

    let filename = format!("almanac-export-{}.json", chrono::Local::now().format("%Y-%m-%d"));
    let content_disposition = format!("attachment; filename=\"{}\"", filename);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&content_disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    tracing::info!(
        entries = export.entries.len(),
        schedule = export.schedule.len(),
        "exported data"
    );
    Ok((headers, Json(export)))
}
