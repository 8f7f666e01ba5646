//! Board entry types.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Date format used when entries are listed.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted board entry, without its credential.
///
/// The password column is deliberately absent: listings are built from this
/// projection, so a stored hash can never reach a response.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BoardEntry {
    /// Storage-assigned primary key.
    pub id: i64,
    /// Entry title (the upload description).
    pub title: String,
    /// Client-supplied key, e.g. `file/photo.png`. Not unique.
    pub updated_id: String,
    /// Insertion timestamp set by the database.
    pub created_dt: NaiveDateTime,
}

impl BoardEntry {
    /// Creation date rendered as `YYYY-MM-DD`.
    pub fn created_date(&self) -> String {
        self.created_dt.format(DATE_FORMAT).to_string()
    }

    /// Convert to the positional row shape used on the wire.
    pub fn to_row(&self) -> EntryRow {
        EntryRow(
            self.id,
            self.title.clone(),
            self.updated_id.clone(),
            self.created_date(),
        )
    }
}

/// Listing row serialized as `[id, title, updated_id, "YYYY-MM-DD"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow(pub i64, pub String, pub String, pub String);

/// Data for inserting a new entry. The password must already be hashed.
#[derive(Clone)]
pub struct NewEntry {
    /// Entry title.
    pub title: String,
    /// Client-supplied key.
    pub updated_id: String,
    /// Encoded credential from [`crate::auth::hash_password`].
    pub password_hash: String,
}

impl NewEntry {
    /// Create a new entry with required fields.
    pub fn new(
        title: impl Into<String>,
        updated_id: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            updated_id: updated_id.into(),
            password_hash: password_hash.into(),
        }
    }
}

impl std::fmt::Debug for NewEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewEntry")
            .field("title", &self.title)
            .field("updated_id", &self.updated_id)
            .finish_non_exhaustive()
    }
}

/// Primary key and stored credential of an entry, used only for deletion.
#[derive(Clone, sqlx::FromRow)]
pub struct StoredCredential {
    /// Entry primary key.
    pub id: i64,
    /// Encoded credential.
    pub password: String,
}

impl std::fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredential")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
