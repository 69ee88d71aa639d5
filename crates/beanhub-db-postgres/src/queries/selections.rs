//! Queries for the `daily_selections` table.

use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use time::Date;

use beanhub_core::{DailySelection, SelectionDate};
use beanhub_storage::StorageError;

use crate::error::is_unique_violation;

/// Row tuple in column order: id, bean_id, date.
type SelectionRow = (i64, i64, Date);

fn selection_from_row(row: SelectionRow) -> DailySelection {
    let (id, bean_id, date) = row;
    DailySelection::new(id, bean_id, SelectionDate::new(date))
}

/// Reads the selection recorded for a date, if any.
pub async fn get_by_date(
    pool: &PgPool,
    date: SelectionDate,
) -> Result<Option<DailySelection>, StorageError> {
    let row: Option<SelectionRow> = query_as(
        "SELECT id, bean_id, date
         FROM daily_selections
         WHERE date = $1",
    )
    .bind(date.into_inner())
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to read selection for {date}: {e}")))?;

    Ok(row.map(selection_from_row))
}

/// Records a selection for a date.
///
/// The unique constraint on `date` arbitrates concurrent inserts: exactly
/// one caller gets the row, every other caller gets `AlreadyExists` and is
/// expected to re-read the winning row.
pub async fn insert(
    pool: &PgPool,
    bean_id: i64,
    date: SelectionDate,
) -> Result<DailySelection, StorageError> {
    let row: SelectionRow = query_as(
        "INSERT INTO daily_selections (bean_id, date)
         VALUES ($1, $2)
         RETURNING id, bean_id, date",
    )
    .bind(bean_id)
    .bind(date.into_inner())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StorageError::already_exists("DailySelection", date.to_string())
        } else {
            StorageError::internal(format!("Failed to record selection for {date}: {e}"))
        }
    })?;

    Ok(selection_from_row(row))
}
