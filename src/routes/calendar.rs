use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::calendar::{style_for, CalendarEvent, DayAgenda, EventSource, EventStyle, Instant, MonthGrid};
use crate::error::AppError;
use crate::models::{DiaryEntry, FieldErrors, ScheduleEntry};
use crate::view::{EditTarget, Editing, Tab, ViewState};
use crate::{AppState, STATIC_HASH};

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    date: Option<NaiveDate>,
    tab: Option<Tab>,
    edit: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_calendar))
        .route("/api/calendar", get(calendar_feed))
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn calendar_href(date: NaiveDate, tab: Tab) -> String {
    format!("/?date={date}&tab={tab}")
}

fn edit_href(date: NaiveDate, tab: Tab, target: &EditTarget) -> String {
    format!("{}&edit={target}", calendar_href(date, tab))
}

/// `datetime-local` input value.
fn input_value(instant: Instant) -> String {
    instant
        .as_datetime()
        .map(|at| at.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

pub(crate) async fn load_view(
    db: &SqlitePool,
    date: NaiveDate,
    tab: Tab,
) -> Result<ViewState, sqlx::Error> {
    let diary = DiaryEntry::all(db).await?;
    let schedule = ScheduleEntry::all(db).await?;

    Ok(ViewState::new(date)
        .with_diary(diary)
        .with_schedule(schedule)
        .select_tab(tab))
}

pub(crate) struct EventChip {
    pub title: String,
    pub time: Option<String>,
    pub description: Option<String>,
    pub style: String,
    pub href: String,
}

pub(crate) struct DayView {
    pub day: u32,
    pub href: String,
    pub in_month: bool,
    pub selected: bool,
    pub events: Vec<EventChip>,
}

pub(crate) struct ScheduleCard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub when: String,
    pub edit_href: String,
}

pub(crate) struct DiaryCard {
    pub id: String,
    pub title: String,
    pub date: String,
    pub content: String,
    pub edit_href: String,
}

pub(crate) struct DiaryEditor {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
}

pub(crate) struct ScheduleEditor {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

/// Values of the "add" forms, echoed back when validation fails.
#[derive(Default)]
pub(crate) struct Draft {
    pub title: String,
    pub content: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

impl Draft {
    /// One-hour slot starting at 09:00 on the selected date.
    fn for_date(date: NaiveDate) -> Self {
        Self {
            start_time: format!("{date}T09:00"),
            end_time: format!("{date}T10:00"),
            ..Self::default()
        }
    }
}

#[derive(Template)]
#[template(path = "calendar.html")]
pub(crate) struct CalendarTemplate {
    pub month_label: String,
    pub prev_href: String,
    pub next_href: String,
    pub today_href: String,
    pub weeks: Vec<Vec<DayView>>,
    pub selected: String,
    pub selected_label: String,
    pub diary_tab: bool,
    pub schedule_tab_href: String,
    pub diary_tab_href: String,
    pub schedule_cards: Vec<ScheduleCard>,
    pub diary_cards: Vec<DiaryCard>,
    pub diary_editor: Option<DiaryEditor>,
    pub schedule_editor: Option<ScheduleEditor>,
    pub draft: Draft,
    pub errors: FieldErrors,
    pub static_hash: &'static str,
}

fn chip(event: &CalendarEvent<'_>, tab: Tab) -> EventChip {
    let (target, description) = match event.source() {
        EventSource::Diary(entry) => (EditTarget::Diary(entry.id.clone()), None),
        EventSource::Schedule(entry) => {
            (EditTarget::Schedule(entry.id.clone()), entry.description.clone())
        }
    };
    let date = event.start().date().unwrap_or_else(today);

    EventChip {
        title: event.title().to_string(),
        time: (!event.all_day())
            .then(|| format!("{} - {}", event.start().format_time(), event.end().format_time())),
        description,
        style: style_for(event.category()).css(),
        href: edit_href(date, tab, &target),
    }
}

fn cards(agenda: &DayAgenda<'_>, tab: Tab) -> (Vec<ScheduleCard>, Vec<DiaryCard>) {
    let schedule = agenda
        .schedule
        .iter()
        .map(|entry| ScheduleCard {
            id: entry.id.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            when: format!(
                "{} - {}",
                entry.start().format_short(),
                entry.end().format_short()
            ),
            edit_href: edit_href(agenda.date, tab, &EditTarget::Schedule(entry.id.clone())),
        })
        .collect();

    let diary = agenda
        .diary
        .iter()
        .map(|entry| DiaryCard {
            id: entry.id.clone(),
            title: entry.title.clone(),
            date: entry
                .created()
                .date()
                .map(|d| d.format("%Y/%m/%d").to_string())
                .unwrap_or_else(|| "Invalid Date".to_string()),
            content: entry.content.clone(),
            edit_href: edit_href(agenda.date, tab, &EditTarget::Diary(entry.id.clone())),
        })
        .collect();

    (schedule, diary)
}

/// Lay out the whole page for a view state.
pub(crate) fn page(view: &ViewState) -> CalendarTemplate {
    let selected = view.selected();
    let tab = view.tab();
    let events = view.events();

    let grid = MonthGrid::build(selected.year(), selected.month(), &events);
    let (month_label, prev_href, next_href, weeks) = match &grid {
        Some(grid) => (
            grid.label(),
            grid.previous().map(|d| calendar_href(d, tab)).unwrap_or_default(),
            grid.next().map(|d| calendar_href(d, tab)).unwrap_or_default(),
            grid.weeks
                .iter()
                .map(|week| {
                    week.iter()
                        .map(|cell| DayView {
                            day: cell.date.day(),
                            href: calendar_href(cell.date, tab),
                            in_month: cell.in_month,
                            selected: cell.date == selected,
                            events: cell.events.iter().map(|e| chip(e, tab)).collect(),
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>(),
        ),
        None => (selected.format("%B %Y").to_string(), String::new(), String::new(), Vec::new()),
    };

    let (schedule_cards, diary_cards) = cards(&view.agenda(), tab);

    let (diary_editor, schedule_editor) = match view.editing() {
        Editing::None => (None, None),
        Editing::Diary(entry) => (
            Some(DiaryEditor {
                id: entry.id.clone(),
                title: entry.title.clone(),
                content: entry.content.clone(),
                date: entry.created().format_short(),
            }),
            None,
        ),
        Editing::Schedule(entry) => (
            None,
            Some(ScheduleEditor {
                id: entry.id.clone(),
                title: entry.title.clone(),
                description: entry.description.clone().unwrap_or_default(),
                start_time: input_value(entry.start()),
                end_time: input_value(entry.end()),
            }),
        ),
    };

    CalendarTemplate {
        month_label,
        prev_href,
        next_href,
        today_href: calendar_href(today(), tab),
        weeks,
        selected: selected.to_string(),
        selected_label: selected.format("%Y/%m/%d").to_string(),
        diary_tab: tab == Tab::Diary,
        schedule_tab_href: calendar_href(selected, Tab::Schedule),
        diary_tab_href: calendar_href(selected, Tab::Diary),
        schedule_cards,
        diary_cards,
        diary_editor,
        schedule_editor,
        draft: Draft::for_date(selected),
        errors: FieldErrors::new(),
        static_hash: STATIC_HASH,
    }
}

async fn show_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = query.date.unwrap_or_else(today);
    let mut view = load_view(&state.db, date, query.tab.unwrap_or_default()).await?;

    if let Some(target) = query.edit.as_deref().and_then(|s| s.parse::<EditTarget>().ok()) {
        view = view.edit(&target);
    }

    Ok(Html(page(&view).render()?))
}

#[derive(Serialize)]
struct StyledEvent<'a> {
    #[serde(flatten)]
    event: CalendarEvent<'a>,
    style: EventStyle,
}

#[derive(Serialize)]
struct CalendarFeed<'a> {
    date: NaiveDate,
    events: Vec<StyledEvent<'a>>,
    agenda: DayAgenda<'a>,
}

/// Projected events plus the agenda of one date, as JSON.
async fn calendar_feed(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, AppError> {
    let date = query.date.unwrap_or_else(today);
    let view = load_view(&state.db, date, Tab::default()).await?;

    let feed = CalendarFeed {
        date,
        events: view
            .events()
            .into_iter()
            .map(|event| StyledEvent {
                style: style_for(event.category()),
                event,
            })
            .collect(),
        agenda: view.agenda(),
    };

    Ok(Json(feed).into_response())
}
