//! Request dispatch for board entries.
//!
//! One event in, one reply out. The method label selects a branch:
//!
//! - `POST`: hash the password, insert, return the full listing
//! - `GET`: return the full listing with CORS headers
//! - `DELETE`: verify the password against the single matching entry, then
//!   delete it if its stored credential is unchanged
//!
//! Anything else is answered with 400. Every error, including storage
//! failures, is turned into a reply here; nothing propagates past
//! [`Dispatcher::dispatch`].

use serde_json::Value;
use tracing::{info, warn};

use super::reply::{success_flag, BoardReply};
use super::repository::EntryRepository;
use super::request::{BoardEvent, CreateEntryRequest, DeleteEntryRequest, RequestMethod};
use super::types::{EntryRow, NewEntry};
use crate::auth::{hash_password, verify_password};
use crate::db::DbPool;
use crate::{DriveboardError, Result};

/// Routes events to the create, list and delete operations.
pub struct Dispatcher<'a> {
    pool: &'a DbPool,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher over the given pool.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Handle one event.
    pub async fn dispatch(&self, event: BoardEvent) -> BoardReply {
        let method = event.method();
        info!(
            method = %method,
            updated_id = event.updated_id.as_deref().unwrap_or("-"),
            "Dispatching board request"
        );

        let result = match method {
            RequestMethod::Post => self.create(event).await,
            RequestMethod::Get => self.list().await,
            RequestMethod::Delete => self.delete(event).await,
            RequestMethod::Other(label) => Err(DriveboardError::UnknownMethod(label)),
        };

        result.unwrap_or_else(|err| BoardReply::from_error(&err))
    }

    async fn create(&self, event: BoardEvent) -> Result<BoardReply> {
        let request = CreateEntryRequest::try_from(event)?;

        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| DriveboardError::Internal(e.to_string()))?;

        let repo = EntryRepository::new(self.pool);
        let id = repo
            .create(&NewEntry::new(
                request.title,
                request.updated_id,
                password_hash,
            ))
            .await?;
        info!(id, "Board entry created");

        Ok(BoardReply::ok("Success", self.listing(&repo).await?))
    }

    async fn list(&self) -> Result<BoardReply> {
        let repo = EntryRepository::new(self.pool);
        Ok(BoardReply::ok("Success", self.listing(&repo).await?).with_cors())
    }

    async fn delete(&self, event: BoardEvent) -> Result<BoardReply> {
        let request = DeleteEntryRequest::try_from(event)?;

        let repo = EntryRepository::new(self.pool);
        let mut credentials = repo.find_credentials(&request.updated_id).await?;

        let credential = match credentials.len() {
            0 => return Err(DriveboardError::NotFound("entry".to_string())),
            1 => credentials.remove(0),
            n => {
                warn!(
                    updated_id = %request.updated_id,
                    matches = n,
                    "Refusing to delete: updated_id is not unique"
                );
                return Err(DriveboardError::Ambiguous(format!(
                    "updated_id {}",
                    request.updated_id
                )));
            }
        };

        // No connection is held while the key is derived.
        let stored = credential.password.clone();
        let candidate = request.password;
        let verified = tokio::task::spawn_blocking(move || verify_password(&stored, &candidate))
            .await
            .map_err(|e| DriveboardError::Internal(e.to_string()))??;

        if !verified {
            warn!(updated_id = %request.updated_id, "Password mismatch on delete");
            return Err(DriveboardError::AuthMismatch);
        }

        if !repo.delete_verified(&credential).await? {
            warn!(
                id = credential.id,
                updated_id = %request.updated_id,
                "Entry changed before it could be deleted"
            );
            return Err(DriveboardError::NotFound("entry".to_string()));
        }
        info!(id = credential.id, updated_id = %request.updated_id, "Board entry deleted");

        Ok(BoardReply::ok("entry deleted", success_flag(true)))
    }

    async fn listing(&self, repo: &EntryRepository<'_>) -> Result<Value> {
        let rows: Vec<EntryRow> = repo.list().await?.iter().map(|e| e.to_row()).collect();
        serde_json::to_value(rows).map_err(|e| DriveboardError::Internal(e.to_string()))
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::Database;
    use serde_json::json;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn post(title: &str, updated_id: &str, password: &str) -> BoardEvent {
        BoardEvent::new("POST")
            .with_title(title)
            .with_updated_id(updated_id)
            .with_password(password)
    }

    fn delete(updated_id: &str, password: &str) -> BoardEvent {
        BoardEvent::new("DELETE")
            .with_updated_id(updated_id)
            .with_password(password)
    }

    async fn stored_hashes(db: &Database, updated_id: &str) -> Vec<String> {
        EntryRepository::new(db.pool())
            .find_credentials(updated_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.password)
            .collect()
    }

    #[tokio::test]
    async fn test_post_creates_entry() {
        let db = setup_db().await;
        let dispatcher = Dispatcher::new(db.pool());

        let reply = dispatcher.dispatch(post("note", "u1", "secret")).await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.message, "Success");
        assert!(!reply.cors);

        let rows = reply.data.unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "note");
        assert_eq!(rows[0][2], "u1");

        let hashes = stored_hashes(&db, "u1").await;
        assert_eq!(hashes.len(), 1);
        assert_ne!(hashes[0], "secret");
        assert!(verify_password(&hashes[0], "secret").unwrap());
    }

    #[tokio::test]
    async fn test_post_listing_matches_table_and_hides_hash() {
        let db = setup_db().await;
        let dispatcher = Dispatcher::new(db.pool());

        dispatcher.dispatch(post("first", "file/1", "pw1")).await;
        let reply = dispatcher.dispatch(post("second", "file/2", "pw2")).await;

        let rows = reply.data.unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows.len() as i64,
            EntryRepository::new(db.pool()).count().await.unwrap()
        );

        let hashes = [
            stored_hashes(&db, "file/1").await,
            stored_hashes(&db, "file/2").await,
        ]
        .concat();
        for row in rows {
            let row = row.as_array().unwrap();
            assert_eq!(row.len(), 4);
            for value in row {
                if let Some(text) = value.as_str() {
                    assert!(!hashes.iter().any(|h| h == text));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_post_missing_field() {
        let db = setup_db().await;
        let dispatcher = Dispatcher::new(db.pool());

        let event = BoardEvent::new("POST").with_title("note").with_password("pw");
        let reply = dispatcher.dispatch(event).await;

        assert_eq!(reply.status, 422);
        assert!(reply.message.contains("updated_id"));
        assert_eq!(EntryRepository::new(db.pool()).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_empty_table() {
        let db = setup_db().await;
        let reply = Dispatcher::new(db.pool())
            .dispatch(BoardEvent::new("GET"))
            .await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.message, "Success");
        assert_eq!(reply.data, Some(json!([])));
        assert!(reply.cors);
    }

    #[tokio::test]
    async fn test_get_rows_shape() {
        let db = setup_db().await;
        let dispatcher = Dispatcher::new(db.pool());
        dispatcher
            .dispatch(post("가족 사진", "file/family.jpg", "pw"))
            .await;

        let reply = dispatcher.dispatch(BoardEvent::new("GET")).await;
        let rows = reply.data.unwrap();
        let row = rows[0].as_array().unwrap();

        assert_eq!(row.len(), 4);
        assert_eq!(row[0], 1);
        assert_eq!(row[1], "가족 사진");
        assert_eq!(row[2], "file/family.jpg");
        let date = row[3].as_str().unwrap();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }

    #[tokio::test]
    async fn test_delete_wrong_password_keeps_row() {
        let db = setup_db().await;
        let dispatcher = Dispatcher::new(db.pool());
        dispatcher.dispatch(post("note", "u1", "secret")).await;

        let reply = dispatcher.dispatch(delete("u1", "wrong")).await;

        assert_eq!(reply.status, 403);
        assert_eq!(reply.message, "password mismatch");
        assert_eq!(reply.data, Some(json!({"success": "n"})));
        assert_eq!(EntryRepository::new(db.pool()).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_correct_password_removes_row() {
        let db = setup_db().await;
        let dispatcher = Dispatcher::new(db.pool());
        dispatcher.dispatch(post("note", "u1", "secret")).await;
        dispatcher.dispatch(post("keep", "u2", "other")).await;

        let reply = dispatcher.dispatch(delete("u1", "secret")).await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.message, "entry deleted");
        assert_eq!(reply.data, Some(json!({"success": "y"})));

        let repo = EntryRepository::new(db.pool());
        assert!(repo.find_credentials("u1").await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_survives_concurrent_write() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = crate::config::DatabaseConfig {
            path: temp_dir
                .path()
                .join("board.db")
                .to_string_lossy()
                .into_owned(),
            ..Default::default()
        };
        let db = Database::connect(&config).await.unwrap();
        Dispatcher::new(db.pool())
            .dispatch(post("note", "u1", "secret"))
            .await;

        let delete_db = db.clone();
        let pending = tokio::spawn(async move {
            Dispatcher::new(delete_db.pool())
                .dispatch(delete("u1", "secret"))
                .await
        });

        // Commit another write while the password is being checked
        tokio::time::sleep(std::time::Duration::from_millis(15)).await;
        EntryRepository::new(db.pool())
            .create(&NewEntry::new("other", "u2", "hash"))
            .await
            .unwrap();

        let reply = pending.await.unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.data, Some(json!({"success": "y"})));

        let repo = EntryRepository::new(db.pool());
        assert!(repo.find_credentials("u1").await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 1);
        db.close().await;
    }

    #[tokio::test]
    async fn test_delete_nonexistent() {
        let db = setup_db().await;
        let reply = Dispatcher::new(db.pool())
            .dispatch(delete("nonexistent", "x"))
            .await;

        assert_eq!(reply.status, 404);
        assert_eq!(reply.message, "entry not found");
        assert_eq!(reply.data, Some(json!({"success": "n"})));
    }

    #[tokio::test]
    async fn test_delete_duplicate_updated_id_is_refused() {
        let db = setup_db().await;
        let dispatcher = Dispatcher::new(db.pool());
        dispatcher.dispatch(post("one", "file/dup", "pw")).await;
        dispatcher.dispatch(post("two", "file/dup", "pw")).await;

        let reply = dispatcher.dispatch(delete("file/dup", "pw")).await;

        assert_eq!(reply.status, 409);
        assert_eq!(reply.data, Some(json!({"success": "n"})));
        assert_eq!(EntryRepository::new(db.pool()).count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_password() {
        let db = setup_db().await;
        let reply = Dispatcher::new(db.pool())
            .dispatch(BoardEvent::new("DELETE").with_updated_id("u1"))
            .await;
        assert_eq!(reply.status, 422);
    }

    #[tokio::test]
    async fn test_delete_corrupt_stored_credential() {
        let db = setup_db().await;
        EntryRepository::new(db.pool())
            .create(&NewEntry::new("note", "u1", "not-a-credential"))
            .await
            .unwrap();

        let reply = Dispatcher::new(db.pool())
            .dispatch(delete("u1", "secret"))
            .await;

        assert_eq!(reply.status, 500);
        assert_eq!(reply.message, "internal error");
        assert_eq!(EntryRepository::new(db.pool()).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let db = setup_db().await;
        let reply = Dispatcher::new(db.pool())
            .dispatch(BoardEvent::new("PUT"))
            .await;

        assert_eq!(reply.status, 400);
        assert_eq!(reply.message, "unknown error");
        assert!(reply.data.is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_becomes_500() {
        let db = setup_db().await;
        db.close().await;

        let reply = Dispatcher::new(db.pool())
            .dispatch(BoardEvent::new("GET"))
            .await;

        assert_eq!(reply.status, 500);
        assert_eq!(reply.message, "internal error");
    }
}
