use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::instant::Instant;
use crate::models::{DiaryEntry, ScheduleEntry};

const LAST_SECOND_OF_DAY: i64 = 24 * 60 * 60 - 1;

/// `[00:00:00Z, 23:59:59Z]` of one calendar date, both ends inclusive.
///
/// The window is always in UTC, whatever offset the viewer is at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::seconds(LAST_SECOND_OF_DAY),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: Instant) -> bool {
        match instant {
            Instant::At(at) => self.start <= at && at <= self.end,
            Instant::Invalid => false,
        }
    }
}

/// Entries belonging to a single selected date, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct DayAgenda<'a> {
    pub date: NaiveDate,
    pub diary: Vec<&'a DiaryEntry>,
    pub schedule: Vec<&'a ScheduleEntry>,
}

impl DayAgenda<'_> {
    pub fn is_empty(&self) -> bool {
        self.diary.is_empty() && self.schedule.is_empty()
    }
}

/// Diary entries are matched on their creation instant and schedule entries
/// on their start instant only. A schedule entry that starts the evening
/// before and runs into this date is not part of it.
pub fn filter_day<'a>(
    date: NaiveDate,
    diary: &'a [DiaryEntry],
    schedule: &'a [ScheduleEntry],
) -> DayAgenda<'a> {
    let window = DayWindow::for_date(date);

    DayAgenda {
        date,
        diary: diary.iter().filter(|e| window.contains(e.created())).collect(),
        schedule: schedule.iter().filter(|e| window.contains(e.start())).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn diary(id: &str, created_at: &str) -> DiaryEntry {
        DiaryEntry {
            id: id.into(),
            title: id.into(),
            content: String::new(),
            created_at: created_at.into(),
        }
    }

    fn schedule(id: &str, start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry {
            id: id.into(),
            title: id.into(),
            description: None,
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    #[test]
    fn window_spans_the_utc_day() {
        let window = DayWindow::for_date(date(2024, 3, 10));
        assert_eq!(window.start().to_rfc3339(), "2024-03-10T00:00:00+00:00");
        assert_eq!(window.end().to_rfc3339(), "2024-03-10T23:59:59+00:00");
    }

    #[test]
    fn boundaries_are_inclusive() {
        let diaries = vec![
            diary("midnight", "2024-03-10T00:00:00Z"),
            diary("last-second", "2024-03-10T23:59:59Z"),
            diary("next-day", "2024-03-11T00:00:00Z"),
            diary("day-before", "2024-03-09T23:59:59Z"),
        ];
        let agenda = filter_day(date(2024, 3, 10), &diaries, &[]);
        let ids: Vec<&str> = agenda.diary.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["midnight", "last-second"]);
    }

    #[test]
    fn unmarked_start_inside_window_is_included() {
        let schedules = vec![schedule("late", "2024-03-10T23:30:00", "2024-03-11T00:30:00Z")];
        let agenda = filter_day(date(2024, 3, 10), &[], &schedules);
        assert_eq!(agenda.schedule.len(), 1);
        assert_eq!(agenda.schedule[0].id, "late");
    }

    #[test]
    fn only_start_instant_is_checked() {
        let schedules = vec![schedule(
            "overnight",
            "2024-03-09T23:00:00Z",
            "2024-03-10T02:00:00Z",
        )];
        let agenda = filter_day(date(2024, 3, 10), &[], &schedules);
        assert!(agenda.schedule.is_empty());

        let previous = filter_day(date(2024, 3, 9), &[], &schedules);
        assert_eq!(previous.schedule.len(), 1);
    }

    #[test]
    fn order_is_preserved_and_invalid_dropped() {
        let diaries = vec![
            diary("b", "2024-03-10T18:00:00"),
            diary("bad", "???"),
            diary("a", "2024-03-10T06:00:00"),
        ];
        let agenda = filter_day(date(2024, 3, 10), &diaries, &[]);
        let ids: Vec<&str> = agenda.diary.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert!(!agenda.is_empty());
    }
}
