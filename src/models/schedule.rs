use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::{backend_timestamp, check_length, require, FieldErrors};
use crate::calendar::instant::{parse_instant, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ScheduleEntry {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

/// Body of both `POST /api/schedule` and `PUT /api/schedule/{id}`.
///
/// `end_time` is expected to be at or after `start_time` but this is not
/// checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleEntryInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

impl ScheduleEntry {
    pub fn start(&self) -> Instant {
        parse_instant(&self.start_time)
    }

    pub fn end(&self) -> Instant {
        parse_instant(&self.end_time)
    }

    pub async fn all(db: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, title, description, start_time, end_time FROM schedule_entries ORDER BY rowid",
        )
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, title, description, start_time, end_time FROM schedule_entries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(db: &SqlitePool, input: &ScheduleEntryInput) -> Result<Self, sqlx::Error> {
        let entry = ScheduleEntry {
            id: Uuid::new_v4().to_string(),
            title: input.title.clone(),
            description: input.description.clone(),
            start_time: input.start_time.clone(),
            end_time: input.end_time.clone(),
        };

        sqlx::query(
            r#"
            INSERT INTO schedule_entries (id, title, description, start_time, end_time)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(&entry.start_time)
        .bind(&entry.end_time)
        .execute(db)
        .await?;

        Ok(entry)
    }

    pub async fn update(
        db: &SqlitePool,
        id: &str,
        input: &ScheduleEntryInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            UPDATE schedule_entries
            SET title = ?, description = ?, start_time = ?, end_time = ?
            WHERE id = ?
            RETURNING id, title, description, start_time, end_time
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.start_time)
        .bind(&input.end_time)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedule_entries WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl ScheduleEntryInput {
    /// Validate, rewrite both instants as naive UTC and turn a blank
    /// description into `None`.
    pub fn normalized(self) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", "Title", &self.title);
        check_length(&mut errors, "title", "Title", &self.title);

        let start_time = backend_timestamp(&mut errors, "start_time", "Start time", &self.start_time);
        let end_time = backend_timestamp(&mut errors, "end_time", "End time", &self.end_time);

        match (start_time, end_time) {
            (Some(start_time), Some(end_time)) if errors.is_empty() => Ok(Self {
                title: self.title,
                description: self.description.filter(|d| !d.trim().is_empty()),
                start_time,
                end_time,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: &str, end: &str) -> ScheduleEntryInput {
        ScheduleEntryInput {
            title: "Dentist".into(),
            description: Some("   ".into()),
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    #[test]
    fn normalized_accepts_form_and_iso_instants() {
        let valid = input("2024-03-10T23:30", "2024-03-11T00:30:00.000Z")
            .normalized()
            .unwrap();
        assert_eq!(valid.start_time, "2024-03-10T23:30:00");
        assert_eq!(valid.end_time, "2024-03-11T00:30:00");
        assert_eq!(valid.description, None);
    }

    #[test]
    fn normalized_does_not_enforce_ordering() {
        let valid = input("2024-03-10T10:00:00Z", "2024-03-10T09:00:00Z")
            .normalized()
            .unwrap();
        assert_eq!(valid.start_time, "2024-03-10T10:00:00");
        assert_eq!(valid.end_time, "2024-03-10T09:00:00");
    }

    #[test]
    fn normalized_reports_every_bad_field() {
        let mut bad = input("", "not a time");
        bad.title = String::new();
        let errors = bad.normalized().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["start_time"], "Start time is required");
        assert_eq!(errors["end_time"], "End time is not a valid date and time");
    }

    #[test]
    fn entry_instants_read_as_utc() {
        let entry = ScheduleEntry {
            id: "1".into(),
            title: "Call".into(),
            description: None,
            start_time: "2024-03-10T23:30:00".into(),
            end_time: "garbage".into(),
        };
        assert_eq!(
            entry.start().as_datetime().unwrap().to_rfc3339(),
            "2024-03-10T23:30:00+00:00"
        );
        assert!(!entry.end().is_valid());
    }
}
