use sqlx::PgPool;

use super::dto::SortBy;
use super::repo_types::{FoodItem, FOOD_COLUMNS};

pub const MAX_PAGE: i64 = 200;

/// Escapes `LIKE` wildcards so the term matches literally.
pub fn like_escape(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match on the name.
pub async fn search(
    db: &PgPool,
    term: &str,
    with_glycemic_index: bool,
    sort: SortBy,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<FoodItem>> {
    let order = match sort {
        SortBy::Name => "name ASC",
        SortBy::Gi => "glycemic_index ASC NULLS LAST, name ASC",
    };
    let sql = format!(
        "SELECT {FOOD_COLUMNS} FROM foods
         WHERE ($1 = '' OR lower(name) LIKE '%' || lower($1) || '%' ESCAPE '\\')
           AND (NOT $2 OR glycemic_index IS NOT NULL)
         ORDER BY {order}
         LIMIT $3 OFFSET $4"
    );
    let rows = sqlx::query_as::<_, FoodItem>(&sql)
        .bind(like_escape(term.trim()))
        .bind(with_glycemic_index)
        .bind(limit.clamp(1, MAX_PAGE))
        .bind(offset.max(0))
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, code: &str) -> anyhow::Result<Option<FoodItem>> {
    let row = sqlx::query_as::<_, FoodItem>(&format!(
        "SELECT {FOOD_COLUMNS} FROM foods WHERE code = $1"
    ))
    .bind(code)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
