pub mod diary;
pub mod schedule;

pub use diary::{DiaryEntry, DiaryEntryUpdate, NewDiaryEntry};
pub use schedule::{ScheduleEntry, ScheduleEntryInput};

use std::collections::HashMap;

use crate::calendar::instant::{parse_instant, Instant};

/// Field name to human readable message.
pub type FieldErrors = HashMap<String, String>;

/// Shape of every timestamp the backend stores and emits: naive UTC, no zone
/// marker.
pub const BACKEND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn require(errors: &mut FieldErrors, field: &str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{label} is required"));
    }
}

fn check_length(errors: &mut FieldErrors, field: &str, label: &str, value: &str) {
    if value.len() > 500 {
        errors.insert(field.to_string(), format!("{label} must be under 500 characters"));
    }
}

/// Parse a client-supplied instant and rewrite it in `BACKEND_FORMAT`.
fn backend_timestamp(errors: &mut FieldErrors, field: &str, label: &str, raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        errors.insert(field.to_string(), format!("{label} is required"));
        return None;
    }

    match parse_instant(raw) {
        Instant::At(at) => Some(at.naive_utc().format(BACKEND_FORMAT).to_string()),
        Instant::Invalid => {
            errors.insert(field.to_string(), format!("{label} is not a valid date and time"));
            None
        }
    }
}
