//! Transactional access to the roster database.
//!
//! A single connection sits behind a mutex; every public operation holds it for
//! exactly one transaction. Dropping a `Transaction` without committing rolls it
//! back, so a failed statement never leaves partial writes behind.

mod attendance;
mod classes;
mod students;

use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, ErrorCode, OptionalExtension, Transaction, TransactionBehavior};

use crate::db;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Class,
    Student,
    Attendance,
}

impl Entity {
    fn table(self) -> &'static str {
        match self {
            Entity::Class => "classes",
            Entity::Student => "students",
            Entity::Attendance => "attendance",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Class => "class",
            Entity::Student => "student",
            Entity::Attendance => "attendance",
        })
    }
}

/// Which kind of database constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Unique,
    ForeignKey,
    Other,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Constraint::Unique => "unique",
            Constraint::ForeignKey => "foreign key",
            Constraint::Other => "integrity",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },
    #[error("{constraint} constraint violated: {message}")]
    ConstraintViolation {
        constraint: Constraint,
        message: String,
    },
    #[error("database operation failed")]
    Database(#[source] rusqlite::Error),
    #[error("store lock poisoned by an earlier panic")]
    Poisoned,
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StoreError::ConstraintViolation {
                constraint: Constraint::Unique,
                ..
            }
        )
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &err {
            if code.code == ErrorCode::ConstraintViolation {
                let constraint = match code.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Constraint::Unique,
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Constraint::ForeignKey,
                    _ => Constraint::Other,
                };
                return StoreError::ConstraintViolation {
                    constraint,
                    message: message.clone().unwrap_or_else(|| code.to_string()),
                };
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(db::open_db(data_dir)?))
    }

    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self::new(db::open_in_memory()?))
    }

    fn read<T>(&self, f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>) -> StoreResult<T> {
        self.run(TransactionBehavior::Deferred, f)
    }

    fn write<T>(&self, f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>) -> StoreResult<T> {
        self.run(TransactionBehavior::Immediate, f)
    }

    fn run<T>(
        &self,
        behavior: TransactionBehavior,
        f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let tx = conn.transaction_with_behavior(behavior)?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

fn ensure_exists(conn: &Connection, entity: Entity, id: i64) -> StoreResult<()> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?", entity.table());
    let found: Option<i64> = conn.query_row(&sql, [id], |r| r.get(0)).optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(StoreError::NotFound { entity, id }),
    }
}

fn delete_row(conn: &Connection, entity: Entity, id: i64) -> StoreResult<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?", entity.table());
    match conn.execute(&sql, [id])? {
        0 => Err(StoreError::NotFound { entity, id }),
        _ => Ok(()),
    }
}
