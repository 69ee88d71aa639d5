//! Embedded schema migrations.
//!
//! The migration SQL is compiled into the binary, so a deployment is a
//! single file with no companion migrations directory.

use std::borrow::Cow;

use sqlx_core::migrate::{Migration, MigrationType, Migrator};
use sqlx_postgres::PgPool;
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};

/// Version, name and SQL of every migration, in apply order. New
/// migrations are appended here together with their file under
/// `migrations/`.
const EMBEDDED: &[(i64, &str, &str)] = &[(
    20250801000001,
    "initial_schema",
    include_str!("../../migrations/20250801000001_initial_schema.sql"),
)];

fn migration_set() -> Vec<Migration> {
    EMBEDDED
        .iter()
        .map(|&(version, name, sql)| Migration {
            version,
            description: Cow::Borrowed(name),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]),
            no_tx: false,
        })
        .collect()
}

/// Applies pending migrations, tracked in the `_sqlx_migrations` table.
///
/// # Errors
///
/// Returns an error when a migration statement fails; already-applied
/// versions are skipped.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<()> {
    let migrator = Migrator {
        migrations: Cow::Owned(migration_set()),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| PostgresError::Migration(e.to_string()))?;

    info!(count = EMBEDDED.len(), "Schema migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_in_apply_order() {
        let set = migration_set();
        assert!(!set.is_empty());

        let versions: Vec<i64> = set.iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        assert_eq!(versions, sorted);
    }

    #[test]
    fn test_initial_schema_creates_both_tables_and_the_date_constraint() {
        let set = migration_set();
        let sql = &set[0].sql;
        assert!(sql.contains("coffee_beans"));
        assert!(sql.contains("daily_selections"));
        assert!(sql.contains("UNIQUE (date)"));
    }
}
