use anyhow::Context;
use sqlx::{types::Json, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::{EventRow, ScheduledEvent};

const EVENT_COLUMNS: &str =
    "id, title, event_date, event_time, details, completed, completed_at, notes";

/// Events whose date lies in `[from, to]`.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<ScheduledEvent>> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM scheduled_events
         WHERE user_id = $1 AND event_date BETWEEN $2 AND $3
         ORDER BY event_date, event_time"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(ScheduledEvent::from).collect())
}

pub async fn find(
    db: &PgPool,
    user_id: Uuid,
    event_id: Uuid,
) -> anyhow::Result<Option<ScheduledEvent>> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM scheduled_events WHERE id = $1 AND user_id = $2"
    ))
    .bind(event_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(ScheduledEvent::from))
}

pub async fn insert_many(
    db: &PgPool,
    user_id: Uuid,
    events: &[ScheduledEvent],
) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin tx")?;
    for e in events {
        sqlx::query(
            r#"
            INSERT INTO scheduled_events
                (id, user_id, title, event_date, event_time, kind, details, completed, completed_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(e.id)
        .bind(user_id)
        .bind(&e.title)
        .bind(e.date)
        .bind(e.time)
        .bind(e.kind().as_str())
        .bind(Json(&e.details))
        .bind(e.completed)
        .bind(e.completed_at)
        .bind(&e.notes)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("insert event {}", e.id))?;
    }
    tx.commit().await.context("commit tx")?;
    Ok(())
}

/// Persists the completion fields of an already loaded event.
pub async fn save_completion(
    db: &PgPool,
    user_id: Uuid,
    event: &ScheduledEvent,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE scheduled_events
        SET completed = $3, completed_at = $4, notes = $5, details = $6
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(event.id)
    .bind(user_id)
    .bind(event.completed)
    .bind(event.completed_at)
    .bind(&event.notes)
    .bind(Json(&event.details))
    .execute(db)
    .await?;
    Ok(())
}

/// Returns whether a row was removed.
pub async fn delete(db: &PgPool, user_id: Uuid, event_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM scheduled_events WHERE id = $1 AND user_id = $2")
        .bind(event_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
