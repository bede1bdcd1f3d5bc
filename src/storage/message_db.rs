use parking_lot::Mutex;
use rusqlite::{Connection, Result as SqlResult, params};
use std::path::Path;

use super::models::StoredMessage;
use crate::common::types::{MessageStatus, UserId};

/// Append-only message log with mutable delivery status.
///
/// All operations are atomic per call: one statement under one lock.
pub struct MessageStore {
    conn: Mutex<Connection>,
}

impl MessageStore {
    /// Open the store at the default location.
    pub fn new() -> SqlResult<Self> {
        Self::with_path("data/chat.db")
    }

    /// Open the store at a custom path (`:memory:` for an ephemeral log).
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store, used by tests.
    pub fn in_memory() -> SqlResult<Self> {
        Self::with_path(":memory:")
    }

    fn init_schema(&self) -> SqlResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sender TEXT NOT NULL,
                receiver TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                status TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_messages_receiver_status
             ON messages(receiver, status)",
            [],
        )?;

        Ok(())
    }

    /// Insert a new message, returning its store-assigned id.
    pub fn append(
        &self,
        sender: UserId,
        receiver: UserId,
        content: &str,
        timestamp: i64,
        status: MessageStatus,
    ) -> SqlResult<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO messages (sender, receiver, content, timestamp, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                sender.as_str(),
                receiver.as_str(),
                content,
                timestamp,
                status.as_str()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Mark a message delivered. Re-marking an already-delivered row is a
    /// benign no-op.
    pub fn set_delivered(&self, id: i64) -> SqlResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE messages SET status = ?1 WHERE id = ?2",
            params![MessageStatus::Delivered.as_str(), id],
        )?;
        Ok(())
    }

    /// Snapshot of undelivered messages for `receiver`, oldest first.
    /// Timestamp ties break by insertion order.
    pub fn pending_for(&self, receiver: UserId) -> SqlResult<Vec<StoredMessage>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, sender, receiver, content, timestamp, status
             FROM messages
             WHERE receiver = ?1 AND status = 'pending'
             ORDER BY timestamp ASC, id ASC",
        )?;

        let messages = stmt
            .query_map(params![receiver.as_str()], |row| {
                Ok(StoredMessage {
                    id: row.get(0)?,
                    sender: user_column(row.get(1)?, 1)?,
                    receiver: user_column(row.get(2)?, 2)?,
                    content: row.get(3)?,
                    timestamp: row.get(4)?,
                    status: status_column(row.get(5)?, 5)?,
                })
            })?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(messages)
    }

    /// Total number of stored messages.
    pub fn count(&self) -> SqlResult<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn user_column(value: String, idx: usize) -> SqlResult<UserId> {
    UserId::parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown user id `{value}`").into(),
        )
    })
}

fn status_column(value: String, idx: usize) -> SqlResult<MessageStatus> {
    MessageStatus::parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown message status `{value}`").into(),
        )
    })
}
