//! Calendar event projection.
//!
//! Diary entries and schedule entries are stored independently. This module
//! turns both collections into one list of [`CalendarEvent`]s for the month
//! grid, picks out the entries belonging to a single day for the side panel,
//! and maps each event category to its display style.

pub mod day;
pub mod event;
pub mod instant;
pub mod month;
pub mod style;

pub use day::{filter_day, DayAgenda, DayWindow};
pub use event::{project, CalendarEvent, Category, EventSource};
pub use instant::{normalize_timestamp, parse_instant, Instant};
pub use month::{DayCell, MonthGrid};
pub use style::{style_for, EventStyle};
