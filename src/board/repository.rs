//! Entry repository for driveboard.
//!
//! All statements against `t_board` live here.

use super::types::{BoardEntry, NewEntry, StoredCredential};
use crate::db::DbPool;
use crate::Result;

const SELECT_ENTRIES: &str = "SELECT id, title, updated_id, created_dt FROM t_board";

/// Repository for board entries.
pub struct EntryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> EntryRepository<'a> {
    /// Create a new EntryRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new entry, stamping `created_dt` with the database clock.
    ///
    /// Returns the assigned ID.
    pub async fn create(&self, new_entry: &NewEntry) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO t_board (title, updated_id, created_dt, password)
             VALUES (?, ?, CURRENT_TIMESTAMP, ?)",
        )
        .bind(&new_entry.title)
        .bind(&new_entry.updated_id)
        .bind(&new_entry.password_hash)
        .execute(self.pool)
        .await?;

        #[cfg(feature = "sqlite")]
        let id = result.last_insert_rowid();
        #[cfg(feature = "mysql")]
        let id = result.last_insert_id() as i64;

        Ok(id)
    }

    /// List every entry in insertion order.
    pub async fn list(&self) -> Result<Vec<BoardEntry>> {
        let entries = sqlx::query_as::<_, BoardEntry>(&format!("{SELECT_ENTRIES} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;
        Ok(entries)
    }

    /// Count all entries.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM t_board")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Fetch `(id, password)` for every entry with the given client key.
    pub async fn find_credentials(&self, updated_id: &str) -> Result<Vec<StoredCredential>> {
        let credentials = sqlx::query_as::<_, StoredCredential>(
            "SELECT id, password FROM t_board WHERE updated_id = ? ORDER BY id",
        )
        .bind(updated_id)
        .fetch_all(self.pool)
        .await?;
        Ok(credentials)
    }

    /// Delete an entry whose credential has already been verified.
    ///
    /// The row is removed only if it still holds the credential that was
    /// verified. Returns false if it was deleted or changed since it was read.
    pub async fn delete_verified(&self, credential: &StoredCredential) -> Result<bool> {
        let result = sqlx::query("DELETE FROM t_board WHERE id = ? AND password = ?")
            .bind(credential.id)
            .bind(&credential.password)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_entry() {
        let db = setup_db().await;
        let repo = EntryRepository::new(db.pool());

        let id = repo
            .create(&NewEntry::new("note", "u1", "hash"))
            .await
            .unwrap();
        assert_eq!(id, 1);

        let entries = repo.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].title, "note");
        assert_eq!(entries[0].updated_id, "u1");
        assert_eq!(entries[0].created_date().len(), "YYYY-MM-DD".len());
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let db = setup_db().await;
        let repo = EntryRepository::new(db.pool());

        assert!(repo.list().await.unwrap().is_empty());

        repo.create(&NewEntry::new("first", "file/1", "h1"))
            .await
            .unwrap();
        repo.create(&NewEntry::new("second", "file/2", "h2"))
            .await
            .unwrap();

        let entries = repo.list().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "first");
        assert_eq!(entries[1].title, "second");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_credentials() {
        let db = setup_db().await;
        let repo = EntryRepository::new(db.pool());

        let id = repo
            .create(&NewEntry::new("note", "u1", "stored-hash"))
            .await
            .unwrap();

        let credentials = repo.find_credentials("u1").await.unwrap();
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].id, id);
        assert_eq!(credentials[0].password, "stored-hash");

        assert!(repo.find_credentials("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_credentials_duplicate_key() {
        let db = setup_db().await;
        let repo = EntryRepository::new(db.pool());

        repo.create(&NewEntry::new("a", "file/same", "h1"))
            .await
            .unwrap();
        repo.create(&NewEntry::new("b", "file/other", "h2"))
            .await
            .unwrap();
        repo.create(&NewEntry::new("c", "file/same", "h3"))
            .await
            .unwrap();

        let credentials = repo.find_credentials("file/same").await.unwrap();
        let hashes: Vec<_> = credentials.iter().map(|c| c.password.as_str()).collect();
        assert_eq!(hashes, vec!["h1", "h3"]);
    }

    #[tokio::test]
    async fn test_delete_verified() {
        let db = setup_db().await;
        let repo = EntryRepository::new(db.pool());
        repo.create(&NewEntry::new("note", "u1", "h")).await.unwrap();
        repo.create(&NewEntry::new("keep", "u2", "h")).await.unwrap();

        let credential = repo.find_credentials("u1").await.unwrap().remove(0);

        assert!(repo.delete_verified(&credential).await.unwrap());
        assert!(!repo.delete_verified(&credential).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_verified_skips_changed_credential() {
        let db = setup_db().await;
        let repo = EntryRepository::new(db.pool());
        repo.create(&NewEntry::new("note", "u1", "old-hash"))
            .await
            .unwrap();

        let credential = repo.find_credentials("u1").await.unwrap().remove(0);
        sqlx::query("UPDATE t_board SET password = ? WHERE id = ?")
            .bind("new-hash")
            .bind(credential.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(!repo.delete_verified(&credential).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unicode_round_trip() {
        let db = setup_db().await;
        let repo = EntryRepository::new(db.pool());

        let id = repo
            .create(&NewEntry::new("가족 여행 사진", "file/여행.jpg", "h"))
            .await
            .unwrap();
        let entries = repo.list().await.unwrap();
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].title, "가족 여행 사진");
        assert_eq!(entries[0].updated_id, "file/여행.jpg");
    }
}
