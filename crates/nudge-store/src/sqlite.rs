//! SQLite-backed task store.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use tracing::debug;

use nudge_scheduler::{ChatId, NewTask, StoreError, Task, TaskId, TaskStore};

/// Timestamp layout for the `due_at` column. Minute precision by
/// construction; lexicographic order matches chronological order, so the
/// due-time index works on plain string comparison.
const DUE_AT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    chat_id INTEGER NOT NULL,
    due_at  TEXT NOT NULL,
    body    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_due_at ON tasks (due_at);
";

/// Durable task store: one row per pending reminder, nothing else persisted.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(db_err)?;
        debug!(path = %path.display(), "opened task database");
        Self::init(conn)
    }

    /// Open a private in-memory database. For tests that want real SQL.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn db_err(e: rusqlite::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn lock_err<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Database("task store mutex poisoned".to_string())
}

fn encode_due_at(due_at: NaiveDateTime) -> String {
    due_at.format(DUE_AT_FORMAT).to_string()
}

fn decode_due_at(raw: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(raw, DUE_AT_FORMAT)
        .map_err(|e| StoreError::Corrupt(format!("bad due_at {raw:?}: {e}")))
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn save(&self, task: NewTask) -> Result<Task, StoreError> {
        let conn = self.conn.lock().map_err(lock_err)?;
        conn.execute(
            "INSERT INTO tasks (chat_id, due_at, body) VALUES (?1, ?2, ?3)",
            params![task.chat_id.0, encode_due_at(task.due_at), task.text],
        )
        .map_err(db_err)?;

        Ok(Task {
            id: TaskId(conn.last_insert_rowid()),
            chat_id: task.chat_id,
            due_at: task.due_at,
            text: task.text,
        })
    }

    async fn find_due(&self, cutoff: NaiveDateTime) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.lock().map_err(lock_err)?;
        let mut stmt = conn
            .prepare("SELECT id, chat_id, due_at, body FROM tasks WHERE due_at <= ?1 ORDER BY id")
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![encode_due_at(cutoff)], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(db_err)?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, chat_id, due_at, body) = row.map_err(db_err)?;
            tasks.push(Task {
                id: TaskId(id),
                chat_id: ChatId(chat_id),
                due_at: decode_due_at(&due_at)?,
                text: body,
            });
        }
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(lock_err)?;
        // Affected-row count deliberately ignored: deleting a row that is
        // already gone is a success, not an error.
        conn.execute("DELETE FROM tasks WHERE id = ?1", params![id.0])
            .map_err(db_err)?;
        Ok(())
    }
}
