use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::post,
    Form, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::calendar::{calendar_href, load_view, page, Draft};
use crate::error::AppError;
use crate::models::{DiaryEntry, DiaryEntryUpdate, FieldErrors, NewDiaryEntry, ScheduleEntry, ScheduleEntryInput};
use crate::view::{noon_utc, EditTarget, Tab, ViewState};
use crate::AppState;

#[derive(Deserialize)]
pub struct DiaryForm {
    date: NaiveDate,
    title: String,
    content: String,
}

#[derive(Deserialize)]
pub struct ScheduleForm {
    date: NaiveDate,
    title: String,
    #[serde(default)]
    description: String,
    start_time: String,
    end_time: String,
}

impl ScheduleForm {
    fn input(&self) -> ScheduleEntryInput {
        ScheduleEntryInput {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/diary", post(create_diary))
        .route("/diary/{id}", post(update_diary).delete(delete_diary))
        .route("/agenda", post(create_schedule))
        .route("/agenda/{id}", post(update_schedule).delete(delete_schedule))
}

/// Re-render the page with the submitted values and their errors.
fn rejected(
    view: &ViewState,
    errors: FieldErrors,
    edit: impl FnOnce(&mut super::calendar::CalendarTemplate),
) -> Result<Response, AppError> {
    let mut template = page(view);
    template.errors = errors;
    edit(&mut template);
    Ok(Html(template.render()?).into_response())
}

/// htmx follows this header after a `hx-delete`.
fn hx_redirect(location: String) -> Response {
    ([("HX-Redirect", location)], "").into_response()
}

async fn create_diary(
    State(state): State<AppState>,
    Form(form): Form<DiaryForm>,
) -> Result<Response, AppError> {
    let new = NewDiaryEntry {
        title: form.title.clone(),
        content: form.content.clone(),
        created_at: Some(noon_utc(form.date)),
    };

    match new.into_entry() {
        Ok(entry) => {
            entry.insert(&state.db).await?;
            tracing::info!(id = %entry.id, "diary entry created from calendar");
            Ok(Redirect::to(&calendar_href(form.date, Tab::Diary)).into_response())
        }
        Err(errors) => {
            let view = load_view(&state.db, form.date, Tab::Diary).await?;
            rejected(&view, errors, |template| {
                template.draft = Draft {
                    title: form.title,
                    content: form.content,
                    ..Draft::default()
                };
            })
        }
    }
}

async fn update_diary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DiaryForm>,
) -> Result<Response, AppError> {
    let update = DiaryEntryUpdate {
        title: form.title,
        content: form.content,
    };

    let errors = update.validate();
    if !errors.is_empty() {
        let view = load_view(&state.db, form.date, Tab::Diary)
            .await?
            .edit(&EditTarget::Diary(id));
        return rejected(&view, errors, |template| {
            if let Some(editor) = template.diary_editor.as_mut() {
                editor.title = update.title;
                editor.content = update.content;
            }
        });
    }

    let Some(entry) = DiaryEntry::update(&state.db, &id, &update).await? else {
        return Ok(Redirect::to(&calendar_href(form.date, Tab::Diary)).into_response());
    };

    tracing::info!(id = %entry.id, "diary entry updated from calendar");
    let date = entry.created().date().unwrap_or(form.date);
    Ok(Redirect::to(&calendar_href(date, Tab::Diary)).into_response())
}

async fn delete_diary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(entry) = DiaryEntry::find(&state.db, &id).await? else {
        return Ok(hx_redirect("/".to_string()));
    };

    DiaryEntry::delete(&state.db, &id).await?;
    tracing::info!(%id, "diary entry deleted from calendar");

    let date = entry.created().date().unwrap_or_else(super::calendar::today);
    Ok(hx_redirect(calendar_href(date, Tab::Diary)))
}

async fn create_schedule(
    State(state): State<AppState>,
    Form(form): Form<ScheduleForm>,
) -> Result<Response, AppError> {
    match form.input().normalized() {
        Ok(input) => {
            let entry = ScheduleEntry::insert(&state.db, &input).await?;
            tracing::info!(id = %entry.id, "schedule entry created from calendar");
            let date = entry.start().date().unwrap_or(form.date);
            Ok(Redirect::to(&calendar_href(date, Tab::Schedule)).into_response())
        }
        Err(errors) => {
            let view = load_view(&state.db, form.date, Tab::Schedule).await?;
            rejected(&view, errors, |template| {
                template.draft = Draft {
                    title: form.title,
                    description: form.description,
                    start_time: form.start_time,
                    end_time: form.end_time,
                    ..Draft::default()
                };
            })
        }
    }
}

async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ScheduleForm>,
) -> Result<Response, AppError> {
    let input = match form.input().normalized() {
        Ok(input) => input,
        Err(errors) => {
            let view = load_view(&state.db, form.date, Tab::Schedule)
                .await?
                .edit(&EditTarget::Schedule(id));
            return rejected(&view, errors, |template| {
                if let Some(editor) = template.schedule_editor.as_mut() {
                    editor.title = form.title;
                    editor.description = form.description;
                    editor.start_time = form.start_time;
                    editor.end_time = form.end_time;
                }
            });
        }
    };

    let Some(entry) = ScheduleEntry::update(&state.db, &id, &input).await? else {
        return Ok(Redirect::to(&calendar_href(form.date, Tab::Schedule)).into_response());
    };

    tracing::info!(id = %entry.id, "schedule entry updated from calendar");
    let date = entry.start().date().unwrap_or(form.date);
    Ok(Redirect::to(&calendar_href(date, Tab::Schedule)).into_response())
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(entry) = ScheduleEntry::find(&state.db, &id).await? else {
        return Ok(hx_redirect("/".to_string()));
    };

    ScheduleEntry::delete(&state.db, &id).await?;
    tracing::info!(%id, "schedule entry deleted from calendar");

    let date = entry.start().date().unwrap_or_else(super::calendar::today);
    Ok(hx_redirect(calendar_href(date, Tab::Schedule)))
}
