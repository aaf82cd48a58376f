pub mod calendar;
pub mod entries;
pub mod export;
pub mod forms;
pub mod schedule;
