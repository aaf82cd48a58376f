//! View-layer state for the calendar screen.
//!
//! [`ViewState`] is replaced, never mutated in place: every entry point
//! consumes the old state and hands back the new one. [`Planner`] pairs a
//! state with an [`ApiClient`] and only swaps in a new state once the backend
//! round trip has succeeded.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{filter_day, project, CalendarEvent, DayAgenda};
use crate::client::{ApiClient, ClientError};
use crate::models::{DiaryEntry, DiaryEntryUpdate, NewDiaryEntry, ScheduleEntry, ScheduleEntryInput};

/// Which side panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Schedule,
    Diary,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Schedule => write!(f, "schedule"),
            Tab::Diary => write!(f, "diary"),
        }
    }
}

/// The entry currently open in the editor, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Editing {
    #[default]
    None,
    Diary(DiaryEntry),
    Schedule(ScheduleEntry),
}

/// Reference to an entry by kind and id, written `diary:<id>` or
/// `schedule:<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Diary(String),
    Schedule(String),
}

impl FromStr for EditTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("diary", id)) if !id.is_empty() => Ok(EditTarget::Diary(id.to_string())),
            Some(("schedule", id)) if !id.is_empty() => Ok(EditTarget::Schedule(id.to_string())),
            _ => Err(format!("unknown edit target: {s}")),
        }
    }
}

impl fmt::Display for EditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditTarget::Diary(id) => write!(f, "diary:{id}"),
            EditTarget::Schedule(id) => write!(f, "schedule:{id}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    diary: Vec<DiaryEntry>,
    schedule: Vec<ScheduleEntry>,
    selected: NaiveDate,
    tab: Tab,
    editing: Editing,
}

impl ViewState {
    pub fn new(selected: NaiveDate) -> Self {
        Self {
            selected,
            ..Self::default()
        }
    }

    pub fn diary(&self) -> &[DiaryEntry] {
        &self.diary
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn editing(&self) -> &Editing {
        &self.editing
    }

    /// Replace the diary collection. An open diary editor is closed if its
    /// entry is gone.
    pub fn with_diary(mut self, diary: Vec<DiaryEntry>) -> Self {
        if let Editing::Diary(open) = &self.editing {
            if !diary.iter().any(|e| e.id == open.id) {
                self.editing = Editing::None;
            }
        }
        self.diary = diary;
        self
    }

    pub fn with_schedule(mut self, schedule: Vec<ScheduleEntry>) -> Self {
        if let Editing::Schedule(open) = &self.editing {
            if !schedule.iter().any(|e| e.id == open.id) {
                self.editing = Editing::None;
            }
        }
        self.schedule = schedule;
        self
    }

    pub fn select_date(self, selected: NaiveDate) -> Self {
        Self { selected, ..self }
    }

    pub fn select_tab(self, tab: Tab) -> Self {
        Self { tab, ..self }
    }

    /// Open the editor on an entry and jump to its date. Targets that do not
    /// resolve to a loaded entry leave the editor closed.
    pub fn edit(self, target: &EditTarget) -> Self {
        let (editing, date) = match target {
            EditTarget::Diary(id) => match self.diary.iter().find(|e| &e.id == id) {
                Some(entry) => (Editing::Diary(entry.clone()), entry.created().date()),
                None => (Editing::None, None),
            },
            EditTarget::Schedule(id) => match self.schedule.iter().find(|e| &e.id == id) {
                Some(entry) => (Editing::Schedule(entry.clone()), entry.start().date()),
                None => (Editing::None, None),
            },
        };

        Self {
            selected: date.unwrap_or(self.selected),
            editing,
            ..self
        }
    }

    pub fn stop_editing(self) -> Self {
        Self {
            editing: Editing::None,
            ..self
        }
    }

    /// Everything on the calendar, recomputed from the current collections.
    pub fn events(&self) -> Vec<CalendarEvent<'_>> {
        project(&self.diary, &self.schedule)
    }

    /// Entries for the selected date.
    pub fn agenda(&self) -> DayAgenda<'_> {
        filter_day(self.selected, &self.diary, &self.schedule)
    }
}

/// Diary entries created from the calendar are pinned to noon UTC of the
/// selected date so they land on that date in every time zone close to UTC.
pub fn noon_utc(date: NaiveDate) -> String {
    format!("{}T12:00:00.000Z", date.format("%Y-%m-%d"))
}

pub struct Planner {
    client: ApiClient,
    state: ViewState,
}

impl Planner {
    pub fn new(client: ApiClient, selected: NaiveDate) -> Self {
        Self {
            client,
            state: ViewState::new(selected),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.replace(|state| state.select_date(date));
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.replace(|state| state.select_tab(tab));
    }

    pub fn edit(&mut self, target: &EditTarget) {
        self.replace(|state| state.edit(target));
    }

    /// Fetch both collections. Each one is replaced independently as soon as
    /// its own request succeeds.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let diary = self.refresh_diary().await;
        let schedule = self.refresh_schedule().await;
        diary.and(schedule)
    }

    pub async fn refresh_diary(&mut self) -> Result<(), ClientError> {
        let entries = self
            .client
            .list_entries()
            .await
            .inspect_err(|e| tracing::warn!("failed to fetch diary entries: {e}"))?;
        self.replace(|state| state.with_diary(entries));
        Ok(())
    }

    pub async fn refresh_schedule(&mut self) -> Result<(), ClientError> {
        let entries = self
            .client
            .list_schedule()
            .await
            .inspect_err(|e| tracing::warn!("failed to fetch schedule entries: {e}"))?;
        self.replace(|state| state.with_schedule(entries));
        Ok(())
    }

    /// Refetch after a write the server already accepted. A failed refetch is
    /// logged by `refresh_*` and leaves the previous collection in place; the
    /// write itself still counts as done.
    async fn resync_diary(&mut self) {
        self.refresh_diary().await.ok();
    }

    async fn resync_schedule(&mut self) {
        self.refresh_schedule().await.ok();
    }

    /// Add a diary entry on the selected date.
    pub async fn create_diary(
        &mut self,
        title: &str,
        content: &str,
    ) -> Result<DiaryEntry, ClientError> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(ClientError::MissingFields("Title and content are required"));
        }

        let new = NewDiaryEntry {
            title: title.to_string(),
            content: content.to_string(),
            created_at: Some(noon_utc(self.state.selected())),
        };
        let created = self
            .client
            .create_entry(&new)
            .await
            .inspect_err(|e| tracing::warn!("failed to create diary entry: {e}"))?;

        self.resync_diary().await;
        Ok(created)
    }

    pub async fn update_diary(
        &mut self,
        id: &str,
        update: &DiaryEntryUpdate,
    ) -> Result<DiaryEntry, ClientError> {
        let updated = self
            .client
            .update_entry(id, update)
            .await
            .inspect_err(|e| tracing::warn!(%id, "failed to update diary entry: {e}"))?;

        self.resync_diary().await;
        self.replace(ViewState::stop_editing);
        Ok(updated)
    }

    /// Callers confirm with the user before calling this.
    pub async fn delete_diary(&mut self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete_entry(id)
            .await
            .inspect_err(|e| tracing::warn!(%id, "failed to delete diary entry: {e}"))?;

        self.resync_diary().await;
        Ok(())
    }

    pub async fn create_schedule(
        &mut self,
        input: &ScheduleEntryInput,
    ) -> Result<ScheduleEntry, ClientError> {
        if input.title.trim().is_empty()
            || input.start_time.trim().is_empty()
            || input.end_time.trim().is_empty()
        {
            return Err(ClientError::MissingFields(
                "Title, start time and end time are required",
            ));
        }

        let created = self
            .client
            .create_schedule(input)
            .await
            .inspect_err(|e| tracing::warn!("failed to create schedule entry: {e}"))?;

        self.resync_schedule().await;
        self.replace(ViewState::stop_editing);
        Ok(created)
    }

    pub async fn update_schedule(
        &mut self,
        id: &str,
        input: &ScheduleEntryInput,
    ) -> Result<ScheduleEntry, ClientError> {
        let updated = self
            .client
            .update_schedule(id, input)
            .await
            .inspect_err(|e| tracing::warn!(%id, "failed to update schedule entry: {e}"))?;

        self.resync_schedule().await;
        self.replace(ViewState::stop_editing);
        Ok(updated)
    }

    pub async fn delete_schedule(&mut self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete_schedule(id)
            .await
            .inspect_err(|e| tracing::warn!(%id, "failed to delete schedule entry: {e}"))?;

        self.resync_schedule().await;
        self.replace(ViewState::stop_editing);
        Ok(())
    }

    fn replace(&mut self, f: impl FnOnce(ViewState) -> ViewState) {
        let state = std::mem::take(&mut self.state);
        self.state = f(state);
    }
}
