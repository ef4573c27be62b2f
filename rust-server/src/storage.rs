//! Contact persistence backed by libsql.
//!
//! The store is an injected capability: the intake workflow only sees the
//! [`ContactStore`] trait, and tests substitute an in-memory fake. The real
//! implementation talks to a remote sqld/Turso database or a local file.

use async_trait::async_trait;
use libsql::{params, Builder, Connection, Database};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Failure talking to the persistence sink. Details stay server-side; the
/// HTTP layer maps this to a generic retry message.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<libsql::Error> for StorageError {
    fn from(e: libsql::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

/// A validated submission ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub ip_address: String,
}

/// A stored contact row. Created exactly once at submission time; never
/// updated or deleted by this service.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: String,
}

/// Capability for persisting contact submissions.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert a new submission as a single statement and return its id.
    async fn insert(&self, contact: &NewContact) -> Result<i64, StorageError>;

    /// Read a stored submission back by id.
    async fn fetch(&self, id: i64) -> Result<Option<ContactSubmission>, StorageError>;
}

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    message TEXT,
    ip_address TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_contacts_email ON contacts(email);
CREATE INDEX IF NOT EXISTS idx_contacts_created ON contacts(created_at);
";

/// libsql-backed contact store.
pub struct LibsqlStore {
    db: Database,
}

impl LibsqlStore {
    /// Open the database behind `url`.
    ///
    /// URLs with a `libsql`/`http`/`https` scheme connect to a remote sqld
    /// instance using `auth_token`; anything else is treated as a local
    /// database file path.
    pub async fn connect(url: &str, auth_token: &str) -> Result<Self, StorageError> {
        let db = if url.starts_with("libsql://")
            || url.starts_with("http://")
            || url.starts_with("https://")
        {
            info!(url = %url, "database_connecting_remote");
            Builder::new_remote(url.to_string(), auth_token.to_string())
                .build()
                .await?
        } else {
            info!(path = %url, "database_opening_local");
            Builder::new_local(url).build().await?
        };

        Ok(Self { db })
    }

    /// Create the contacts table and its lookup indexes. Idempotent.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA).await?;
        info!("database_schema_ready");
        Ok(())
    }

    fn get_connection(&self) -> Result<Connection, StorageError> {
        Ok(self.db.connect()?)
    }
}

#[async_trait]
impl ContactStore for LibsqlStore {
    async fn insert(&self, contact: &NewContact) -> Result<i64, StorageError> {
        let conn = self.get_connection()?;

        conn.execute(
            "INSERT INTO contacts (name, email, phone, message, ip_address) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                contact.name.as_str(),
                contact.email.as_str(),
                contact.phone.as_deref(),
                contact.message.as_deref(),
                contact.ip_address.as_str(),
            ],
        )
        .await?;

        Ok(conn.last_insert_rowid())
    }

    async fn fetch(&self, id: i64) -> Result<Option<ContactSubmission>, StorageError> {
        let conn = self.get_connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, email, phone, message, ip_address, created_at \
                 FROM contacts WHERE id = ?",
                params![id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(ContactSubmission {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3).ok(),
                message: row.get(4).ok(),
                ip_address: row.get(5).ok(),
                created_at: row.get(6)?,
            })),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db_path(tag: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "comingsoon-test-{}-{}.db",
            tag,
            std::process::id()
        ));
        // Start from a clean file so reruns do not see old rows.
        let _ = std::fs::remove_file(&path);
        path.to_string_lossy().into_owned()
    }

    async fn open_store(tag: &str) -> LibsqlStore {
        let store = LibsqlStore::connect(&temp_db_path(tag), "")
            .await
            .expect("open local database");
        store.init_schema().await.expect("create schema");
        store
    }

    fn sample_contact() -> NewContact {
        NewContact {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            message: Some("Hello there".to_string()),
            ip_address: "203.0.113.7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_round_trip() {
        let store = open_store("roundtrip").await;

        let id = store.insert(&sample_contact()).await.unwrap();
        let row = store.fetch(id).await.unwrap().expect("row exists");

        assert_eq!(row.id, id);
        assert_eq!(row.name, "Jane");
        assert_eq!(row.email, "jane@example.com");
        assert_eq!(row.phone, None);
        assert_eq!(row.message, Some("Hello there".to_string()));
        assert_eq!(row.ip_address, Some("203.0.113.7".to_string()));
        // created_at is assigned by the storage layer, not the caller.
        assert!(!row.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = open_store("monotonic").await;

        let first = store.insert(&sample_contact()).await.unwrap();
        let second = store.insert(&sample_contact()).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_schema_init_is_idempotent() {
        let store = open_store("idempotent").await;

        let id = store.insert(&sample_contact()).await.unwrap();
        store.init_schema().await.expect("second init succeeds");

        // Existing rows survive a repeated init.
        assert!(store.fetch(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_fetch_missing_row() {
        let store = open_store("missing").await;

        assert!(store.fetch(9999).await.unwrap().is_none());
    }
}
