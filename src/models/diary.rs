use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::{backend_timestamp, check_length, require, FieldErrors, BACKEND_FORMAT};
use crate::calendar::instant::{parse_instant, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DiaryEntry {
    pub id: String,
    pub title: String,
    /// Markdown source, stored verbatim.
    pub content: String,
    pub created_at: String,
}

/// Body of `POST /api/entries`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDiaryEntry {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of `PUT /api/entries/{id}`. The creation instant is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiaryEntryUpdate {
    pub title: String,
    pub content: String,
}

impl DiaryEntry {
    pub fn new(title: String, content: String, created_at: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at,
        }
    }

    /// The creation instant, read as UTC when no zone marker is present.
    pub fn created(&self) -> Instant {
        parse_instant(&self.created_at)
    }

    pub async fn all(db: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as("SELECT id, title, content, created_at FROM diary_entries ORDER BY rowid")
            .fetch_all(db)
            .await
    }

    pub async fn find(db: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT id, title, content, created_at FROM diary_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn insert(&self, db: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO diary_entries (id, title, content, created_at) VALUES (?, ?, ?, ?)")
            .bind(&self.id)
            .bind(&self.title)
            .bind(&self.content)
            .bind(&self.created_at)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn update(
        db: &SqlitePool,
        id: &str,
        update: &DiaryEntryUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            UPDATE diary_entries SET title = ?, content = ?
            WHERE id = ?
            RETURNING id, title, content, created_at
            "#,
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Returns whether a row was removed.
    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM diary_entries WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl NewDiaryEntry {
    /// Validate and build the entry to persist. A missing creation instant
    /// means "now".
    pub fn into_entry(self) -> Result<DiaryEntry, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", "Title", &self.title);
        check_length(&mut errors, "title", "Title", &self.title);
        require(&mut errors, "content", "Content", &self.content);

        let created_at = match self.created_at.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                backend_timestamp(&mut errors, "created_at", "Date", raw)
            }
            _ => Some(Utc::now().naive_utc().format(BACKEND_FORMAT).to_string()),
        };

        match created_at {
            Some(created_at) if errors.is_empty() => {
                Ok(DiaryEntry::new(self.title, self.content, created_at))
            }
            _ => Err(errors),
        }
    }
}

impl DiaryEntryUpdate {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", "Title", &self.title);
        check_length(&mut errors, "title", "Title", &self.title);
        require(&mut errors, "content", "Content", &self.content);
        errors
    }
}
