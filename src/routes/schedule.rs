use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::error::AppError;
use crate::models::{ScheduleEntry, ScheduleEntryInput};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/schedule", get(list_schedule).post(create_schedule))
        .route(
            "/api/schedule/{id}",
            get(show_schedule).put(update_schedule).delete(delete_schedule),
        )
}

async fn list_schedule(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduleEntry>>, AppError> {
    Ok(Json(ScheduleEntry::all(&state.db).await?))
}

async fn show_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleEntry>, AppError> {
    ScheduleEntry::find(&state.db, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn create_schedule(
    State(state): State<AppState>,
    Json(payload): Json<ScheduleEntryInput>,
) -> Result<impl IntoResponse, AppError> {
    let input = payload.normalized()?;
    let entry = ScheduleEntry::insert(&state.db, &input).await?;

    tracing::info!(id = %entry.id, start = %entry.start_time, "schedule entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Replaces every field of the entry.
async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ScheduleEntryInput>,
) -> Result<Json<ScheduleEntry>, AppError> {
    let input = payload.normalized()?;
    let entry = ScheduleEntry::update(&state.db, &id, &input)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(id = %entry.id, "schedule entry updated");
    Ok(Json(entry))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !ScheduleEntry::delete(&state.db, &id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(%id, "schedule entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
