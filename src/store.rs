//! Todo ↔ redb persistence.
//!
//! The store is the sole owner of todo records. Every operation opens its
//! own transaction against redb and commits (durably) before returning;
//! nothing is cached in process memory between calls.

use crate::todo::Todo;
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use std::sync::Arc;
use uuid::Uuid;

const TODOS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("todos");

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct TodoStore {
    db: Arc<Database>,
}

impl TodoStore {
    /// Open (or create) the database at the given path.
    /// Creates the todos table if it doesn't exist.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(TODOS)?;
        }
        txn.commit()?;

        Ok(TodoStore { db: Arc::new(db) })
    }

    /// All todos, newest first (created_at descending).
    pub fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TODOS)?;

        let mut todos = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let todo: Todo = postcard::from_bytes(value.value())
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            todos.push(todo);
        }

        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    /// Create a todo from the given text. The id and both timestamps are
    /// assigned here, not by callers. Text whose trimmed form is empty is
    /// rejected; otherwise it is stored verbatim.
    pub fn create(&self, text: &str) -> Result<Todo, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }

        let todo = Todo::new(text);
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TODOS)?;
            let bytes = postcard::to_allocvec(&todo)
                .map_err(|e| StoreError::Encode(e.to_string()))?;
            table.insert(todo.id.as_bytes().as_slice(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(todo)
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TODOS)?;

        match table.get(id.as_bytes().as_slice())? {
            Some(data) => {
                let todo = postcard::from_bytes(data.value())
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(Some(todo))
            }
            None => Ok(None),
        }
    }

    /// Read-modify-write under a single write transaction.
    ///
    /// redb serializes write transactions, so two concurrent updates of the
    /// same id cannot interleave — each sees the other's committed state.
    /// `updated_at` is bumped after the mutator runs.
    pub fn update<F>(&self, id: Uuid, mutate: F) -> Result<Todo, StoreError>
    where
        F: FnOnce(&mut Todo),
    {
        let txn = self.db.begin_write()?;
        let todo;
        {
            let mut table = txn.open_table(TODOS)?;

            let mut current = {
                match table.get(id.as_bytes().as_slice())? {
                    Some(data) => postcard::from_bytes::<Todo>(data.value())
                        .map_err(|e| StoreError::Decode(e.to_string()))?,
                    None => return Err(StoreError::NotFound),
                }
            };

            mutate(&mut current);
            current.updated_at = Utc::now();

            let bytes = postcard::to_allocvec(&current)
                .map_err(|e| StoreError::Encode(e.to_string()))?;
            table.insert(id.as_bytes().as_slice(), bytes.as_slice())?;
            todo = current;
        }
        txn.commit()?;
        Ok(todo)
    }

    /// Remove a todo. Returns whether it existed.
    pub fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let txn = self.db.begin_write()?;
        let deleted;
        {
            let mut table = txn.open_table(TODOS)?;
            deleted = table.remove(id.as_bytes().as_slice())?.is_some();
        }
        txn.commit()?;
        Ok(deleted)
    }
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// create() was given text that is empty once trimmed.
    EmptyText,
    /// update() referenced an id that is not in the store.
    NotFound,
    Redb(String),
    Decode(String),
    Encode(String),
}

// redb 2.x has many error types. Blanket them all into StoreError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StoreError {
            fn from(e: $t) -> Self { StoreError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::EmptyText => write!(f, "todo text must not be empty"),
            StoreError::NotFound => write!(f, "no todo with that id"),
            StoreError::Redb(e) => write!(f, "redb: {e}"),
            StoreError::Decode(e) => write!(f, "decode: {e}"),
            StoreError::Encode(e) => write!(f, "encode: {e}"),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
