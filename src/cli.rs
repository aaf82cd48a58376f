use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use dialoguer::Confirm;
use sqlx::SqlitePool;

use crate::calendar::DayAgenda;
use crate::client::ApiClient;
use crate::models::ScheduleEntryInput;
use crate::routes::export::ExportData;
use crate::view::Planner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryKind {
    Diary,
    Schedule,
}

/// Plain-text rendering of one day, schedule first.
pub fn render_agenda(agenda: &DayAgenda<'_>) -> String {
    let mut out = String::new();
    write_agenda(&mut out, agenda).ok();
    out
}

fn write_agenda(out: &mut impl fmt::Write, agenda: &DayAgenda<'_>) -> fmt::Result {
    writeln!(out, "Schedule for {}", agenda.date.format("%Y/%m/%d"))?;
    if agenda.schedule.is_empty() {
        writeln!(out, "  (nothing scheduled)")?;
    }
    for entry in &agenda.schedule {
        writeln!(
            out,
            "  {} - {}  {}",
            entry.start().format_short(),
            entry.end().format_short(),
            entry.title
        )?;
        if let Some(description) = &entry.description {
            writeln!(out, "      {description}")?;
        }
    }

    writeln!(out, "Diary for {}", agenda.date.format("%Y/%m/%d"))?;
    if agenda.diary.is_empty() {
        writeln!(out, "  (no entries)")?;
    }
    for entry in &agenda.diary {
        writeln!(out, "  {}  [{}]", entry.title, entry.id)?;
        for line in entry.content.lines() {
            writeln!(out, "      {line}")?;
        }
    }
    Ok(())
}

pub async fn agenda(client: ApiClient, date: NaiveDate) -> Result<()> {
    let mut planner = Planner::new(client, date);
    planner.refresh().await?;
    print!("{}", render_agenda(&planner.state().agenda()));
    Ok(())
}

pub async fn note(client: ApiClient, date: NaiveDate, title: &str, content: &str) -> Result<()> {
    let mut planner = Planner::new(client, date);
    let entry = planner.create_diary(title, content).await?;
    println!("Created diary entry {} on {}", entry.id, date);
    Ok(())
}

pub async fn plan(client: ApiClient, input: ScheduleEntryInput) -> Result<()> {
    let mut planner = Planner::new(client, chrono::Utc::now().date_naive());
    let entry = planner.create_schedule(&input).await?;
    println!(
        "Scheduled {} ({} - {})",
        entry.title,
        entry.start().format_short(),
        entry.end().format_short()
    );
    Ok(())
}

/// Deletes are irreversible, so they are confirmed interactively unless
/// `assume_yes` is set.
pub async fn remove(client: ApiClient, kind: EntryKind, id: &str, assume_yes: bool) -> Result<()> {
    let noun = match kind {
        EntryKind::Diary => "diary entry",
        EntryKind::Schedule => "schedule entry",
    };

    if !assume_yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete this {noun}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    let mut planner = Planner::new(client, chrono::Utc::now().date_naive());
    match kind {
        EntryKind::Diary => planner.delete_diary(id).await?,
        EntryKind::Schedule => planner.delete_schedule(id).await?,
    }
    println!("Deleted {noun} {id}");
    Ok(())
}

/// Load an export file into the database in one transaction. Rows whose id
/// already exists are left untouched. Returns how many rows were inserted.
pub async fn import_data(pool: &SqlitePool, file_path: &Path) -> Result<u64> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    let data: ExportData = serde_json::from_str(&content).context("Not an export file")?;

    let mut imported = 0;
    let mut tx = pool.begin().await?;

    for entry in &data.entries {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO diary_entries (id, title, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(&entry.created_at)
        .execute(&mut *tx)
        .await?;
        imported += result.rows_affected();
    }

    for entry in &data.schedule {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO schedule_entries (id, title, description, start_time, end_time)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(&entry.start_time)
        .bind(&entry.end_time)
        .execute(&mut *tx)
        .await?;
        imported += result.rows_affected();
    }

    tx.commit().await?;
    tracing::info!(imported, exported_at = %data.exported_at, "import finished");
    Ok(imported)
}
