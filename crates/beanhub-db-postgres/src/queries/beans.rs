//! CRUD and search queries for the `coffee_beans` table.

use bigdecimal::BigDecimal;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use beanhub_core::CoffeeBean;
use beanhub_storage::{NewBean, StorageError};

/// Row tuple in column order: id, name, colour, country, description,
/// price, image_url, available.
type BeanRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    BigDecimal,
    String,
    bool,
);

fn bean_from_row(row: BeanRow) -> CoffeeBean {
    let (id, name, colour, country, description, price, image_url, available) = row;
    CoffeeBean {
        id,
        name,
        colour,
        country,
        description,
        price,
        image_url,
        available,
    }
}

/// Escapes LIKE metacharacters so a keyword matches literally.
///
/// ILIKE treats `%`, `_` and `\` as pattern syntax; the search contract is
/// a plain substring match, so they are neutralized before the keyword is
/// wrapped in wildcards.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Lists all available beans, ordered by id.
pub async fn list_available(pool: &PgPool) -> Result<Vec<CoffeeBean>, StorageError> {
    let rows: Vec<BeanRow> = query_as(
        "SELECT id, name, colour, country, description, price, image_url, available
         FROM coffee_beans
         WHERE available
         ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to list beans: {e}")))?;

    Ok(rows.into_iter().map(bean_from_row).collect())
}

/// Reads a bean by id.
///
/// Returns `None` if no row exists.
pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<CoffeeBean>, StorageError> {
    let row: Option<BeanRow> = query_as(
        "SELECT id, name, colour, country, description, price, image_url, available
         FROM coffee_beans
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to read bean {id}: {e}")))?;

    Ok(row.map(bean_from_row))
}

/// Case-insensitive substring search over name, country and colour.
///
/// Availability is not filtered here; that is the caller's concern.
pub async fn search(pool: &PgPool, keyword: &str) -> Result<Vec<CoffeeBean>, StorageError> {
    let pattern = like_pattern(keyword);

    let rows: Vec<BeanRow> = query_as(
        "SELECT id, name, colour, country, description, price, image_url, available
         FROM coffee_beans
         WHERE name ILIKE $1 OR country ILIKE $1 OR colour ILIKE $1
         ORDER BY id",
    )
    .bind(&pattern)
    .fetch_all(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to search beans: {e}")))?;

    Ok(rows.into_iter().map(bean_from_row).collect())
}

/// Inserts a new bean and returns it with the database-assigned id.
pub async fn insert(pool: &PgPool, new_bean: &NewBean) -> Result<CoffeeBean, StorageError> {
    let row: BeanRow = query_as(
        "INSERT INTO coffee_beans (name, colour, country, description, price, image_url, available)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, name, colour, country, description, price, image_url, available",
    )
    .bind(&new_bean.name)
    .bind(&new_bean.colour)
    .bind(&new_bean.country)
    .bind(&new_bean.description)
    .bind(&new_bean.price)
    .bind(&new_bean.image_url)
    .bind(new_bean.available)
    .fetch_one(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to create bean: {e}")))?;

    Ok(bean_from_row(row))
}

/// Replaces an existing bean wholesale.
///
/// Returns `NotFound` if no row with the given id exists.
pub async fn update(pool: &PgPool, bean: &CoffeeBean) -> Result<CoffeeBean, StorageError> {
    let row: Option<BeanRow> = query_as(
        "UPDATE coffee_beans
         SET name = $2, colour = $3, country = $4, description = $5,
             price = $6, image_url = $7, available = $8
         WHERE id = $1
         RETURNING id, name, colour, country, description, price, image_url, available",
    )
    .bind(bean.id)
    .bind(&bean.name)
    .bind(&bean.colour)
    .bind(&bean.country)
    .bind(&bean.description)
    .bind(&bean.price)
    .bind(&bean.image_url)
    .bind(bean.available)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to update bean {}: {e}", bean.id)))?;

    match row {
        Some(row) => Ok(bean_from_row(row)),
        None => Err(StorageError::not_found("CoffeeBean", bean.id.to_string())),
    }
}

/// Deletes a bean by id.
///
/// Returns `NotFound` if no row with the given id exists.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), StorageError> {
    let result = query("DELETE FROM coffee_beans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to delete bean {id}: {e}")))?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("CoffeeBean", id.to_string()));
    }

    Ok(())
}
