//! Database schema and migrations for driveboard.
//!
//! Migrations are applied in order when the database is opened. The
//! `schema_version` table records which ones have run.

/// Bookkeeping table for applied migrations.
#[cfg(feature = "sqlite")]
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Bookkeeping table for applied migrations.
#[cfg(feature = "mysql")]
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version     BIGINT NOT NULL PRIMARY KEY,
    applied_at  DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Database migrations.
#[cfg(feature = "sqlite")]
pub const MIGRATIONS: &[&str] = &[
    // v1: board entries
    r#"
CREATE TABLE t_board (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    updated_id  TEXT NOT NULL,                           -- client key, not unique
    created_dt  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    password    TEXT NOT NULL                            -- base64(salt || pbkdf2 key)
);

CREATE INDEX idx_t_board_updated_id ON t_board(updated_id);
"#,
];

/// Database migrations.
#[cfg(feature = "mysql")]
pub const MIGRATIONS: &[&str] = &[
    // v1: board entries
    r#"
CREATE TABLE t_board (
    id          BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    title       TEXT NOT NULL,
    updated_id  VARCHAR(1024) NOT NULL,
    created_dt  DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    password    TEXT NOT NULL,
    INDEX idx_t_board_updated_id (updated_id(255))
) DEFAULT CHARSET = utf8mb4;
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_first_migration_contains_board_table() {
        let first = MIGRATIONS[0];
        assert!(first.contains("CREATE TABLE t_board"));
        for column in ["title", "updated_id", "created_dt", "password"] {
            assert!(first.contains(column), "missing column {column}");
        }
    }

    #[test]
    fn test_updated_id_is_not_unique() {
        assert!(!MIGRATIONS[0].contains("UNIQUE"));
    }
}
