use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::error::AppError;
use crate::models::{DiaryEntry, DiaryEntryUpdate, NewDiaryEntry};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/entries", get(list_entries).post(create_entry))
        .route(
            "/api/entries/{id}",
            get(show_entry).put(update_entry).delete(delete_entry),
        )
}

async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<DiaryEntry>>, AppError> {
    Ok(Json(DiaryEntry::all(&state.db).await?))
}

async fn show_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DiaryEntry>, AppError> {
    DiaryEntry::find(&state.db, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewDiaryEntry>,
) -> Result<impl IntoResponse, AppError> {
    let entry = payload.into_entry()?;
    entry.insert(&state.db).await?;

    tracing::info!(id = %entry.id, created_at = %entry.created_at, "diary entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<DiaryEntryUpdate>,
) -> Result<Json<DiaryEntry>, AppError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let entry = DiaryEntry::update(&state.db, &id, &payload)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(id = %entry.id, "diary entry updated");
    Ok(Json(entry))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !DiaryEntry::delete(&state.db, &id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(%id, "diary entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
