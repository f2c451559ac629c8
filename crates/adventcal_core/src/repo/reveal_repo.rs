//! Reveal-state repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the per-door "revealed" flag across process restarts.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Absence of a record means "not revealed".
//! - Un-revealing deletes the record instead of storing `false`, so storage
//!   stays proportional to the number of ever-revealed doors.
//! - Day keys outside `1..=24` are rejected before any SQL runs.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::card::is_valid_day;
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

const REVEAL_TABLE: &str = "revealed_days";
const REVEAL_COLUMNS: &[&str] = &["day", "revealed_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for reveal-state persistence and schema validation.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Day key does not address a door of this calendar.
    DayOutOfRange(u8),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DayOutOfRange(day) => write!(f, "door day out of range: {day}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column missing: {table}.{column}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for per-door reveal flags.
pub trait RevealRepository {
    /// Returns whether `day` is currently marked revealed.
    fn is_revealed(&self, day: u8) -> RepoResult<bool>;

    /// Flips the revealed flag for `day` and returns the new value.
    fn toggle(&self, day: u8) -> RepoResult<bool>;

    /// Lists currently revealed days in ascending order.
    fn revealed_days(&self) -> RepoResult<Vec<u8>>;

    /// Removes every reveal record.
    fn clear_all(&self) -> RepoResult<()>;
}

/// SQLite-backed reveal-state repository.
pub struct SqliteRevealRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRevealRepository<'conn> {
    /// Wraps a bootstrapped connection after validating its schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the reveal-state storage shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl RevealRepository for SqliteRevealRepository<'_> {
    fn is_revealed(&self, day: u8) -> RepoResult<bool> {
        ensure_day(day)?;

        let revealed: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM revealed_days WHERE day = ?1);",
            [i64::from(day)],
            |row| row.get(0),
        )?;
        Ok(revealed == 1)
    }

    fn toggle(&self, day: u8) -> RepoResult<bool> {
        ensure_day(day)?;

        // Each statement is atomic on its own; with the insert-or-ignore
        // probe the pair stays correct even without an explicit transaction.
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO revealed_days (day) VALUES (?1);",
            [i64::from(day)],
        )?;

        let revealed = if inserted == 1 {
            true
        } else {
            self.conn
                .execute("DELETE FROM revealed_days WHERE day = ?1;", [i64::from(day)])?;
            false
        };

        info!("event=reveal_toggle module=repo status=ok day={day} revealed={revealed}");
        Ok(revealed)
    }

    fn revealed_days(&self) -> RepoResult<Vec<u8>> {
        let mut stmt = self
            .conn
            .prepare("SELECT day FROM revealed_days ORDER BY day ASC;")?;
        let mut rows = stmt.query([])?;
        let mut days = Vec::new();

        while let Some(row) = rows.next()? {
            days.push(row.get::<_, i64>(0)? as u8);
        }

        Ok(days)
    }

    fn clear_all(&self) -> RepoResult<()> {
        let removed = self.conn.execute("DELETE FROM revealed_days;", [])?;
        info!("event=reveal_clear module=repo status=ok removed={removed}");
        Ok(())
    }
}

fn ensure_day(day: u8) -> RepoResult<()> {
    if is_valid_day(day) {
        Ok(())
    } else {
        Err(RepoError::DayOutOfRange(day))
    }
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [REVEAL_TABLE],
        |row| row.get(0),
    )?;
    if table_exists != 1 {
        return Err(RepoError::MissingRequiredTable(REVEAL_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({REVEAL_TABLE});"))?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }

    for &column in REVEAL_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: REVEAL_TABLE,
                column,
            });
        }
    }

    Ok(())
}
