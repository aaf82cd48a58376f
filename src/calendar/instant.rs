use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Naive layouts accepted once the zone marker has been dealt with. Covers the
/// backend's own output, `datetime-local` form values and SQLite's spaced form.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// A point in time that may have failed to parse.
///
/// Malformed timestamps do not abort a projection; they travel through as
/// `Invalid` and never fall inside any window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instant {
    At(DateTime<Utc>),
    Invalid,
}

impl Instant {
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Instant::At(at) => Some(*at),
            Instant::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Instant::At(_))
    }

    /// Calendar date of the instant in UTC.
    pub fn date(&self) -> Option<NaiveDate> {
        self.as_datetime().map(|at| at.date_naive())
    }

    /// `2024/03/10 23:30`, the layout used on agenda cards.
    pub fn format_short(&self) -> String {
        match self {
            Instant::At(at) => at.format("%Y/%m/%d %H:%M").to_string(),
            Instant::Invalid => "Invalid Date".to_string(),
        }
    }

    /// `23:30`, used for timed events in the month grid.
    pub fn format_time(&self) -> String {
        match self {
            Instant::At(at) => at.format("%H:%M").to_string(),
            Instant::Invalid => "--:--".to_string(),
        }
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(at: DateTime<Utc>) -> Self {
        Instant::At(at)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instant::At(at) => write!(f, "{}", at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Instant::Invalid => write!(f, "Invalid Date"),
        }
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Instant::At(at) => {
                serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Instant::Invalid => serializer.serialize_none(),
        }
    }
}

/// Whether the timestamp already says which zone it is in, either with a
/// trailing `Z` or a numeric offset after the time of day.
pub fn has_zone_marker(raw: &str) -> bool {
    let raw = raw.trim_end();
    if raw.ends_with(['Z', 'z']) {
        return true;
    }

    match raw.find(['T', 't', ' ']) {
        Some(sep) => raw[sep..].contains(['+', '-']),
        None => false,
    }
}

/// Append a UTC marker to timestamps that carry none, so they are never read
/// as local time. Applying it twice is the same as applying it once.
pub fn normalize_timestamp(raw: &str) -> Cow<'_, str> {
    if has_zone_marker(raw) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("{raw}Z"))
    }
}

pub fn parse_instant(raw: &str) -> Instant {
    let normalized = normalize_timestamp(raw.trim());

    if let Ok(at) = DateTime::parse_from_rfc3339(&normalized) {
        return Instant::At(at.with_timezone(&Utc));
    }

    // Offsets without a colon, e.g. `-0500`.
    if let Ok(at) = DateTime::parse_from_str(&normalized, OFFSET_FORMAT) {
        return Instant::At(at.with_timezone(&Utc));
    }

    // RFC 3339 insists on seconds; minute precision still counts as UTC.
    let Some(body) = normalized.strip_suffix(['Z', 'z']) else {
        return Instant::Invalid;
    };

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(body, format).ok())
        .map(|naive| Instant::At(naive.and_utc()))
        .unwrap_or(Instant::Invalid)
}
