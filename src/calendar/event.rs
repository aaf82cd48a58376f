use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::instant::Instant;
use crate::models::{DiaryEntry, ScheduleEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Diary,
    Schedule,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Diary => write!(f, "diary"),
            Category::Schedule => write!(f, "schedule"),
        }
    }
}

/// Back-reference from an event to the entry it was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "entry", rename_all = "lowercase")]
pub enum EventSource<'a> {
    Diary(&'a DiaryEntry),
    Schedule(&'a ScheduleEntry),
}

impl<'a> EventSource<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            EventSource::Diary(entry) => &entry.id,
            EventSource::Schedule(entry) => &entry.id,
        }
    }
}

/// Render-ready view of a diary or schedule entry.
///
/// Events are recomputed from the entry collections whenever they are needed
/// and borrow from them. The category is read off the source variant, so it
/// cannot disagree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarEvent<'a> {
    title: &'a str,
    start: Instant,
    end: Instant,
    all_day: bool,
    source: EventSource<'a>,
}

impl<'a> CalendarEvent<'a> {
    /// Diary entries become all-day events pinned to their creation instant.
    pub fn from_diary(entry: &'a DiaryEntry) -> Self {
        let created = entry.created();
        Self {
            title: &entry.title,
            start: created,
            end: created,
            all_day: true,
            source: EventSource::Diary(entry),
        }
    }

    pub fn from_schedule(entry: &'a ScheduleEntry) -> Self {
        Self {
            title: &entry.title,
            start: entry.start(),
            end: entry.end(),
            all_day: false,
            source: EventSource::Schedule(entry),
        }
    }

    pub fn title(&self) -> &'a str {
        self.title
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn all_day(&self) -> bool {
        self.all_day
    }

    pub fn category(&self) -> Category {
        match self.source {
            EventSource::Diary(_) => Category::Diary,
            EventSource::Schedule(_) => Category::Schedule,
        }
    }

    pub fn source(&self) -> EventSource<'a> {
        self.source
    }
}

impl Serialize for CalendarEvent<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CalendarEvent", 6)?;
        state.serialize_field("title", self.title)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("end", &self.end)?;
        state.serialize_field("all_day", &self.all_day)?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("source", &self.source)?;
        state.end()
    }
}

/// Merge both collections into one event list: schedule events first, then
/// diary events, each in input order. Nothing is sorted, dropped or
/// deduplicated.
pub fn project<'a>(diary: &'a [DiaryEntry], schedule: &'a [ScheduleEntry]) -> Vec<CalendarEvent<'a>> {
    let mut events = Vec::with_capacity(diary.len() + schedule.len());
    events.extend(schedule.iter().map(CalendarEvent::from_schedule));
    events.extend(diary.iter().map(CalendarEvent::from_diary));
    events
}
