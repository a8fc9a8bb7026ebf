//! Journal record store over one SQLite connection.
//!
//! # Responsibility
//! - Own the process's journal connection with explicit open/close.
//! - Provide generic CRUD, date-range and equality queries for every
//!   [`Collection`].
//! - Run the habit delete cascade as one atomic unit.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT` and are never reused.
//! - Date ranges are inclusive on both ends.
//! - Deleting an absent id succeeds without effect.
//! - The store does not validate record content; callers do.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::habit::{Habit, HabitCompletion};
use crate::model::{RecordId, Stored};
use crate::repo::collection::{day_value, Collection, ColumnName, Dated, DAY_COLUMN};
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound {
        collection: &'static str,
        id: RecordId,
    },
    /// A write would break a uniqueness or reference constraint.
    Conflict(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => write!(f, "{collection} not found: {id}"),
            Self::Conflict(message) => write!(f, "conflicting write: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::Conflict(_) | Self::InvalidData(_) => None,
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
        match value {
            rusqlite::Error::SqliteFailure(err, message)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Self::Conflict(message.unwrap_or_else(|| err.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

/// Handle to the journal database.
pub struct JournalStore {
    conn: Connection,
}

impl JournalStore {
    /// Opens (or creates) the journal file with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens an isolated in-memory journal.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Closes the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> RepoResult<()> {
        self.conn.close().map_err(|(_, err)| RepoError::from(err))?;
        info!("event=store_close module=repo status=ok");
        Ok(())
    }

    /// Raw connection access for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Inserts a record and returns its freshly assigned id.
    pub fn insert<C: Collection>(&self, record: &C) -> RepoResult<RecordId> {
        let placeholders = (1..=C::COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            C::TABLE,
            C::COLUMNS.join(", ")
        );
        self.conn.execute(&sql, params_from_iter(record.to_values()))?;

        let id = self.conn.last_insert_rowid();
        debug!(
            "event=record_insert module=repo status=ok collection={} id={id}",
            C::NAME
        );
        Ok(id)
    }

    pub fn get_by_id<C: Collection>(&self, id: RecordId) -> RepoResult<Option<Stored<C>>> {
        let sql = format!("{} WHERE id = ?1;", select_sql::<C>());
        Ok(self.query(&sql, vec![Value::Integer(id)])?.into_iter().next())
    }

    /// Replaces every data column of an existing record.
    pub fn update<C: Collection>(&self, id: RecordId, record: &C) -> RepoResult<()> {
        let assignments = C::COLUMNS
            .iter()
            .zip(record.to_values())
            .map(|(column, value)| (*column, value))
            .collect::<Vec<_>>();
        self.write_columns::<C>(id, assignments)
    }

    /// Updates only the given columns of an existing record.
    pub fn patch<C: Collection>(
        &self,
        id: RecordId,
        assignments: Vec<(C::Column, Value)>,
    ) -> RepoResult<()> {
        if assignments.is_empty() {
            return match self.get_by_id::<C>(id)? {
                Some(_) => Ok(()),
                None => Err(RepoError::NotFound {
                    collection: C::NAME,
                    id,
                }),
            };
        }
        let assignments = assignments
            .into_iter()
            .map(|(column, value)| (column.name(), value))
            .collect::<Vec<_>>();
        self.write_columns::<C>(id, assignments)
    }

    /// Deletes a record by id. Absent ids are a no-op.
    pub fn delete<C: Collection>(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1;", C::TABLE), [id])?;
        debug!(
            "event=record_delete module=repo status=ok collection={} id={id} removed={changed}",
            C::NAME
        );
        Ok(())
    }

    /// Records whose day lies in `start..=end`, ordered by day then id.
    pub fn query_by_date_range<C: Dated>(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<Stored<C>>> {
        let sql = format!(
            "{} WHERE {DAY_COLUMN} BETWEEN ?1 AND ?2 ORDER BY {DAY_COLUMN} ASC, id ASC;",
            select_sql::<C>()
        );
        self.query(&sql, vec![day_value(start), day_value(end)])
    }

    /// Records whose `column` equals `value`, ordered by id.
    pub fn query_by_equality<C: Collection>(
        &self,
        column: C::Column,
        value: impl Into<Value>,
    ) -> RepoResult<Vec<Stored<C>>> {
        let sql = format!(
            "{} WHERE {} = ?1 ORDER BY id ASC;",
            select_sql::<C>(),
            column.name()
        );
        self.query(&sql, vec![value.into()])
    }

    /// Every record of a collection, ordered by id.
    pub fn list_all<C: Collection>(&self) -> RepoResult<Vec<Stored<C>>> {
        let sql = format!("{} ORDER BY id ASC;", select_sql::<C>());
        self.query(&sql, Vec::new())
    }

    pub fn count<C: Collection>(&self) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", C::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Deletes a habit together with all of its completions.
    ///
    /// Both deletes commit together or not at all, and the write lock is
    /// taken up front so no completion for this habit can be inserted
    /// in between. Returns the number of completions removed.
    pub fn delete_habit_cascade(&self, habit_id: RecordId) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let removed = tx.execute(
            &format!("DELETE FROM {} WHERE habit_id = ?1;", HabitCompletion::TABLE),
            [habit_id],
        )?;
        tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", Habit::TABLE),
            [habit_id],
        )?;
        tx.commit()?;

        info!(
            "event=habit_delete module=repo status=ok habit_id={habit_id} completions_removed={removed}"
        );
        Ok(removed)
    }

    fn write_columns<C: Collection>(
        &self,
        id: RecordId,
        assignments: Vec<(&'static str, Value)>,
    ) -> RepoResult<()> {
        let set_clause = assignments
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let id_index = assignments.len() + 1;
        let sql = format!(
            "UPDATE {} SET {set_clause} WHERE id = ?{id_index};",
            C::TABLE
        );

        let mut values = assignments
            .into_iter()
            .map(|(_, value)| value)
            .collect::<Vec<_>>();
        values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                collection: C::NAME,
                id,
            });
        }
        Ok(())
    }

    fn query<C: Collection>(&self, sql: &str, values: Vec<Value>) -> RepoResult<Vec<Stored<C>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let id: RecordId = row.get("id")?;
            records.push(Stored::new(id, C::from_row(row)?));
        }
        Ok(records)
    }
}

fn select_sql<C: Collection>() -> String {
    format!("SELECT id, {} FROM {}", C::COLUMNS.join(", "), C::TABLE)
}
