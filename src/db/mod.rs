//! SQLite persistence.
//!
//! Tables:
//! - `users`: id, username (unique), password (bcrypt hash), email
//! - `student`, `course`: named records
//! - `student_course`: many-to-many enrollment between the two

mod courses;
mod users;

pub use courses::{Course, Student, StudentDetail};

use parking_lot::Mutex;
use rusqlite::Connection;

use crate::config::DatabaseConfig;
use crate::error::Result;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    email TEXT
);

CREATE TABLE IF NOT EXISTS student (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS course (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS student_course (
    student_id INTEGER NOT NULL REFERENCES student(id) ON DELETE CASCADE,
    course_id INTEGER NOT NULL REFERENCES course(id) ON DELETE CASCADE,
    PRIMARY KEY (student_id, course_id)
);
CREATE INDEX IF NOT EXISTS idx_student_course_course ON student_course(course_id);
";

/// Handle to the relational store, shared by every request handler
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database described by `config` and ensure the tables exist
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let conn = Connection::open(&config.path)?;
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;",
            )?;
            conn
        };
        tracing::debug!("Opened database at {}", config.path.display());
        Self::init(conn)
    }

    /// A fresh database that lives only as long as this handle
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

/// True when `err` is a UNIQUE or PRIMARY KEY violation
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
