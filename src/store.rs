//! Append-only note storage.
//!
//! Every operation opens its own SQLite connection and closes it when done;
//! there is no pool and no locking beyond what SQLite does itself.

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    ConnectOptions, Connection,
};

use crate::{auth::Identity, models::note::Note};

pub const ANONYMOUS_OWNER: &str = "anonymous";
pub const LIST_LIMIT: i64 = 50;

const CREATE_NOTES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        owner_email TEXT NOT NULL,
        created_at INTEGER DEFAULT (strftime('%s','now'))
    )";

#[derive(Debug, Clone)]
pub struct NoteStore {
    options: SqliteConnectOptions,
}

impl NoteStore {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self { options }
    }

    /// Create the notes table if it does not exist yet. Safe to run on every start.
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(CREATE_NOTES_TABLE).execute(&mut conn).await;
        conn.close().await?;
        result.map(|_| ())
    }

    /// Up to fifty notes, newest first.
    pub async fn list_recent(&self) -> Result<Vec<Note>, sqlx::Error> {
        let mut conn = self.acquire().await?;
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, content, owner_email, created_at FROM notes ORDER BY id DESC LIMIT ?",
        )
        .bind(LIST_LIMIT)
        .fetch_all(&mut conn)
        .await;
        conn.close().await?;
        notes
    }

    /// Store a note and return the owner it was stamped with.
    ///
    /// Nothing ties `supplied_owner` to `resolved`: a caller may stamp any
    /// owner on any note.
    pub async fn create(
        &self,
        content: &str,
        supplied_owner: &str,
        resolved: Option<&Identity>,
    ) -> Result<String, sqlx::Error> {
        let owner = owner_precedence(supplied_owner, resolved);

        let mut conn = self.acquire().await?;
        let result =
            sqlx::query("INSERT INTO notes (content, owner_email, created_at) VALUES (?, ?, ?)")
                .bind(content)
                .bind(&owner)
                .bind(chrono::Utc::now().timestamp())
                .execute(&mut conn)
                .await;
        conn.close().await?;
        let inserted = result?;

        tracing::debug!(id = inserted.last_insert_rowid(), owner = %owner, "note created");
        Ok(owner)
    }

    async fn acquire(&self) -> Result<SqliteConnection, sqlx::Error> {
        self.options.connect().await
    }
}

/// Supplied owner if non-empty, else the resolved identity, else `anonymous`.
pub fn owner_precedence(supplied_owner: &str, resolved: Option<&Identity>) -> String {
    if !supplied_owner.is_empty() {
        return supplied_owner.to_owned();
    }
    resolved
        .map(|identity| identity.as_str().to_owned())
        .unwrap_or_else(|| ANONYMOUS_OWNER.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::resolve_token;
    use crate::auth::token;

    async fn temp_store() -> (tempfile::TempDir, NoteStore) {
        let dir = tempfile::tempdir().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("notes.db"))
            .create_if_missing(true);
        let store = NoteStore::new(options);
        store.init().await.unwrap();
        (dir, store)
    }

    fn identity(email: &str) -> Identity {
        resolve_token(&token::encode(email)).unwrap()
    }

    #[test]
    fn owner_precedence_order() {
        let bob = identity("bob@x.com");
        assert_eq!(owner_precedence("a@x.com", Some(&bob)), "a@x.com");
        assert_eq!(owner_precedence("", Some(&bob)), "bob@x.com");
        assert_eq!(owner_precedence("", None), ANONYMOUS_OWNER);
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let (_dir, store) = temp_store().await;
        store.init().await.unwrap();
        assert!(store.list_recent().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_note() {
        let (_dir, store) = temp_store().await;
        let owner = store.create("hi", "", None).await.unwrap();
        assert_eq!(owner, "anonymous");

        let notes = store.list_recent().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "hi");
        assert_eq!(notes[0].owner_email, "anonymous");
        assert!(notes[0].created_at > 0);
    }

    #[tokio::test]
    async fn supplied_owner_beats_resolved_identity() {
        let (_dir, store) = temp_store().await;
        let bob = identity("bob@x.com");
        let owner = store.create("hi", "a@x.com", Some(&bob)).await.unwrap();
        assert_eq!(owner, "a@x.com");
        assert_eq!(store.list_recent().await.unwrap()[0].owner_email, "a@x.com");
    }

    #[tokio::test]
    async fn list_is_capped_and_newest_first() {
        let (_dir, store) = temp_store().await;
        for i in 1..=51 {
            store.create(&format!("note {}", i), "", None).await.unwrap();
        }

        let notes = store.list_recent().await.unwrap();
        assert_eq!(notes.len(), 50);
        assert!(notes.windows(2).all(|w| w[0].id > w[1].id));
        assert_eq!(notes[0].content, "note 51");
        assert!(notes.iter().all(|n| n.content != "note 1"));
    }
}
