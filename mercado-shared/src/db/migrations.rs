/// Database migration runner
///
/// This module provides utilities for running and inspecting database
/// migrations using sqlx's migration system, plus the additive
/// notification-column migration that older databases need.
///
/// # Migration Files
///
/// Migrations are stored in the `migrations/` directory at the workspace
/// root, one `{timestamp}_{name}.sql` file per migration, and are embedded
/// into the binary at compile time.
///
/// # Example
///
/// ```no_run
/// use mercado_shared::db::pool::{create_pool, DatabaseConfig};
/// use mercado_shared::db::migrations::{run_migrations, ensure_notification_columns};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// run_migrations(&pool).await?;
/// ensure_notification_columns(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::mysql::MySqlPool;
use tracing::{debug, info, warn};

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Latest applied migration version (timestamp)
    pub latest_version: Option<i64>,
}

/// Notification preference columns added to `usuarios`
///
/// These arrived after the table was first deployed, so they are applied as
/// an additive ALTER at startup rather than as a numbered migration. Each
/// entry is a full column definition with a safe default.
const NOTIFICATION_COLUMNS: &[(&str, &str)] = &[
    ("notify_email", "BOOLEAN NOT NULL DEFAULT TRUE"),
    ("notify_sms", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ("notify_push", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ("push_token", "VARCHAR(512) NULL"),
];

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a migration fails to
/// execute, or the database connection is lost mid-run.
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Ensures the notification preference columns exist on `usuarios`
///
/// Issues one `ALTER TABLE ... ADD COLUMN` per preference column. A
/// "Duplicate column name" error means the column is already present and is
/// treated as a no-op; any other database error propagates.
///
/// This keeps databases created before the notification feature in sync
/// without requiring manual intervention, and makes re-running the
/// migration harmless.
///
/// # Errors
///
/// Returns an error for any database failure other than a duplicate column.
pub async fn ensure_notification_columns(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for (column, definition) in NOTIFICATION_COLUMNS {
        let statement = format!("ALTER TABLE usuarios ADD COLUMN {} {}", column, definition);

        match sqlx::query(&statement).execute(pool).await {
            Ok(_) => {
                info!(column, "Added notification column to usuarios");
            }
            Err(e) if is_duplicate_column_error(&e) => {
                debug!(column, "Notification column already exists, skipping");
            }
            Err(e) => {
                warn!(column, error = %e, "Failed to add notification column");
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Checks whether a sqlx error is MySQL's "Duplicate column name"
///
/// MySQL reports duplicate columns as error 1060 with SQLSTATE 42S21. The
/// message match is kept as a fallback for drivers that surface only the
/// text.
pub fn is_duplicate_column_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            classify_duplicate_column(db_err.code().as_deref(), db_err.message())
        }
        _ => false,
    }
}

fn classify_duplicate_column(code: Option<&str>, message: &str) -> bool {
    if let Some(code) = code {
        if code == "42S21" || code == "1060" {
            return true;
        }
    }

    message.contains("Duplicate column")
}

/// Gets the current migration status
///
/// # Errors
///
/// Returns an error if the migrations table cannot be queried.
pub async fn get_migration_status(pool: &MySqlPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    // The migrations table only exists after the first run
    let table_exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM information_schema.tables
         WHERE table_schema = DATABASE()
           AND table_name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if table_exists == 0 {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version)
         FROM _sqlx_migrations
         WHERE success = TRUE",
    )
    .fetch_one(pool)
    .await?;

    debug!(
        applied_migrations = count,
        latest_version = ?latest_version,
        "Migration status retrieved"
    );

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_duplicate_column_by_sqlstate() {
        assert!(classify_duplicate_column(
            Some("42S21"),
            "Duplicate column name 'notify_email'"
        ));
    }

    #[test]
    fn test_classify_duplicate_column_by_errno() {
        assert!(classify_duplicate_column(
            Some("1060"),
            "Duplicate column name 'push_token'"
        ));
    }

    #[test]
    fn test_classify_duplicate_column_by_message() {
        assert!(classify_duplicate_column(
            None,
            "Duplicate column name 'notify_sms'"
        ));
    }

    #[test]
    fn test_classify_other_errors_propagate() {
        assert!(!classify_duplicate_column(
            Some("42S02"),
            "Table 'mercado.usuarios' doesn't exist"
        ));
        assert!(!classify_duplicate_column(None, "Connection reset by peer"));
    }

    #[test]
    fn test_notification_columns_are_nullable_or_defaulted() {
        // Additive columns must not break existing rows
        for (column, definition) in NOTIFICATION_COLUMNS {
            assert!(
                definition.contains("DEFAULT") || definition.contains("NULL"),
                "column {} has no default and is not nullable",
                column
            );
        }
    }

    // Integration tests require a running database
}
