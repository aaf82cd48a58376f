use chrono::{Datelike, Days, Months, NaiveDate};

use super::event::CalendarEvent;

#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub in_month: bool,
    pub events: Vec<CalendarEvent<'a>>,
}

/// Monday-first weeks covering one month, padded with days of the adjacent
/// months so every week is complete.
#[derive(Debug, Clone)]
pub struct MonthGrid<'a> {
    first: NaiveDate,
    pub weeks: Vec<Vec<DayCell<'a>>>,
}

impl<'a> MonthGrid<'a> {
    /// Returns `None` for a month outside `1..=12` or a year chrono cannot
    /// represent.
    pub fn build(year: i32, month: u32, events: &[CalendarEvent<'a>]) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;

        let lead = Days::new(first.weekday().num_days_from_monday().into());
        let mut cursor = first.checked_sub_days(lead)?;
        let mut weeks = Vec::new();

        while cursor <= last {
            let mut week = Vec::with_capacity(7);
            for _ in 0..7 {
                week.push(DayCell {
                    date: cursor,
                    in_month: cursor.month() == month && cursor.year() == year,
                    events: events.iter().filter(|e| covers(e, cursor)).copied().collect(),
                });
                cursor = cursor.succ_opt()?;
            }
            weeks.push(week);
        }

        Some(Self { first, weeks })
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn previous(&self) -> Option<NaiveDate> {
        self.first.checked_sub_months(Months::new(1))
    }

    pub fn next(&self) -> Option<NaiveDate> {
        self.first.checked_add_months(Months::new(1))
    }

    /// `March 2024`
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

/// An event occupies every UTC date from its start through its end. Events
/// with an unparseable start have no place on the grid; an unparseable or
/// earlier end collapses the event onto its start date.
fn covers(event: &CalendarEvent<'_>, date: NaiveDate) -> bool {
    let Some(start) = event.start().date() else {
        return false;
    };
    let end = event.end().date().filter(|end| *end >= start).unwrap_or(start);
    start <= date && date <= end
}
