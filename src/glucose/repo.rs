use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::{GlucoseReading, ReadingRow};

pub async fn insert(db: &PgPool, user_id: Uuid, r: &GlucoseReading) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO glucose_readings
            (id, user_id, level, reading_date, reading_time, ate_something, meal_type, food_description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(r.id)
    .bind(user_id)
    .bind(r.level)
    .bind(r.date)
    .bind(r.time)
    .bind(r.ate_something)
    .bind(r.meal_type.map(|m| m.as_str()))
    .bind(&r.food_description)
    .execute(db)
    .await?;
    Ok(())
}

/// Start of the lookback window. A window reaching past the representable
/// range is unbounded.
pub fn lookback_start(now: OffsetDateTime, days: Option<u32>) -> Option<OffsetDateTime> {
    days.and_then(|d| now.checked_sub(Duration::days(i64::from(d))))
}

/// Newest first. `days = None` returns the whole history.
pub async fn list_recent(
    db: &PgPool,
    user_id: Uuid,
    days: Option<u32>,
) -> anyhow::Result<Vec<GlucoseReading>> {
    let since = lookback_start(OffsetDateTime::now_utc(), days);
    let rows = sqlx::query_as::<_, ReadingRow>(
        r#"
        SELECT id, level, reading_date, reading_time, ate_something, meal_type, food_description
        FROM glucose_readings
        WHERE user_id = $1 AND ($2::timestamptz IS NULL OR recorded_at >= $2)
        ORDER BY recorded_at DESC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(GlucoseReading::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn lookback_subtracts_days() {
        let now = datetime!(2024-06-10 12:00 UTC);
        assert_eq!(lookback_start(now, Some(7)), Some(datetime!(2024-06-03 12:00 UTC)));
        assert_eq!(lookback_start(now, None), None);
    }

    #[test]
    fn oversized_window_is_unbounded() {
        let now = datetime!(2024-06-10 12:00 UTC);
        assert_eq!(lookback_start(now, Some(10_000_000)), None);
        assert_eq!(lookback_start(now, Some(u32::MAX)), None);
    }
}
