//! Database module for driveboard.
//!
//! Provides the sqlx connection pool and migration management. The backend
//! is chosen at compile time: SQLite (feature `sqlite`, default) or
//! MySQL/MariaDB (feature `mysql`).

mod schema;

pub use schema::{MIGRATIONS, SCHEMA_VERSION_TABLE};

use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolOptions;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::{DriveboardError, Result};

#[cfg(all(feature = "sqlite", feature = "mysql"))]
compile_error!("features `sqlite` and `mysql` are mutually exclusive");

#[cfg(not(any(feature = "sqlite", feature = "mysql")))]
compile_error!("enable exactly one of the `sqlite` or `mysql` features");

/// The sqlx database driver in use.
#[cfg(feature = "sqlite")]
pub type DbBackend = sqlx::Sqlite;

/// The sqlx database driver in use.
#[cfg(feature = "mysql")]
pub type DbBackend = sqlx::MySql;

/// Connection pool for the selected backend.
pub type DbPool = sqlx::Pool<DbBackend>;

#[cfg(feature = "sqlite")]
type DbConnectOptions = sqlx::sqlite::SqliteConnectOptions;

#[cfg(feature = "mysql")]
type DbConnectOptions = sqlx::mysql::MySqlConnectOptions;

/// Database wrapper owning the process-wide connection pool.
///
/// Connections are tested before they are handed out, and broken ones are
/// replaced lazily, so a dropped server connection costs one reconnect
/// instead of failing every later request.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connect using the given configuration and apply pending migrations.
    ///
    /// Failure to reach the database is reported as
    /// [`DriveboardError::DatabaseConnection`].
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = connect_options(config)?;
        info!(backend = backend_name(), "Connecting to database");

        let pool = PoolOptions::<DbBackend>::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .map_err(|e| DriveboardError::DatabaseConnection(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Open an in-memory database for testing.
    ///
    /// The pool holds exactly one connection that never expires, since every
    /// SQLite in-memory connection is a separate database.
    #[cfg(feature = "sqlite")]
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");
        let options = DbConnectOptions::new().in_memory(true).foreign_keys(true);

        let pool = PoolOptions::<DbBackend>::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DriveboardError::DatabaseConnection(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Check that a connection can be acquired and a trivial query runs.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Get the current schema version (0 if no migration has run).
    pub async fn schema_version(&self) -> Result<i64> {
        if !self.table_exists("schema_version").await? {
            return Ok(0);
        }

        let version: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
                .fetch_one(&self.pool)
                .await?;
        Ok(version)
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        let current_version = self.schema_version().await?;

        if current_version as usize >= MIGRATIONS.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            MIGRATIONS.len()
        );

        sqlx::raw_sql(SCHEMA_VERSION_TABLE)
            .execute(&self.pool)
            .await?;

        for (i, migration) in MIGRATIONS.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let mut tx = self.pool.begin().await?;
            sqlx::raw_sql(migration).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            debug!("Migration v{} applied successfully", version);
        }

        info!(
            "Database migration complete (now at version {})",
            MIGRATIONS.len()
        );
        Ok(())
    }

    /// Check if a table exists.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        #[cfg(feature = "sqlite")]
        let sql = "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?";
        #[cfg(feature = "mysql")]
        let sql = "SELECT COUNT(*) FROM information_schema.tables
                   WHERE table_schema = DATABASE() AND table_name = ?";

        let count: i64 = sqlx::query_scalar(sql)
            .bind(table_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &backend_name())
            .finish()
    }
}

/// Name of the compiled-in backend.
pub fn backend_name() -> &'static str {
    #[cfg(feature = "sqlite")]
    {
        "sqlite"
    }
    #[cfg(feature = "mysql")]
    {
        "mysql"
    }
}

#[cfg(feature = "sqlite")]
fn connect_options(config: &DatabaseConfig) -> Result<DbConnectOptions> {
    use sqlx::sqlite::SqliteJournalMode;
    use std::path::Path;

    let options = match &config.url {
        Some(url) => DbConnectOptions::from_str(url)
            .map_err(|e| DriveboardError::DatabaseConnection(e.to_string()))?,
        None => {
            let path = Path::new(&config.path);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            DbConnectOptions::new()
                .filename(path)
                .journal_mode(SqliteJournalMode::Wal)
        }
    };

    Ok(options
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5)))
}

#[cfg(feature = "mysql")]
fn connect_options(config: &DatabaseConfig) -> Result<DbConnectOptions> {
    match &config.url {
        Some(url) => DbConnectOptions::from_str(url)
            .map_err(|e| DriveboardError::DatabaseConnection(e.to_string())),
        None => Ok(DbConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .charset("utf8mb4")),
    }
}
