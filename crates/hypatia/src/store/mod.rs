//! SQLite persistence layer for Hypatia.
//!
//! ## Architecture
//!
//! All durable state lives in a single SQLite database behind [`Store`]:
//!
//! | Table | Contents |
//! |-------|----------|
//! | `articles` | one row per article (pmid, title, dates, pub model) |
//! | `journals` | journals, upserted by id |
//! | `article_journal` | article → journal link |
//! | `authors`, `article_authors` | authors deduplicated by name pair, plus linkage |
//! | `citations` | directed citation edges, citing → cited |
//! | `article_keywords` | keyword linkage |
//! | `grants`, `article_grants` | funding records plus linkage |
//!
//! The citation-count cache table (`citation_counts`) is owned by
//! [`crate::cache::CitationCache`] and is not part of the durable schema.
//!
//! ## Concurrency
//!
//! A single connection guarded by a `Mutex` serializes writers. Multi-step
//! mutations run inside one SQLite transaction, so readers on the same
//! connection never observe intermediate state and a failure at any step
//! rolls the whole sequence back.

pub(crate) mod articles;
mod authors;
mod grants;
mod helpers;
pub(crate) mod journals;
mod keywords;
mod schema;

pub(crate) use articles::InsertOutcome;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::types::{StoreSnapshot, StoreStats};

/// Handle to the bibliographic database.
pub struct Store {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl Store {
    /// Open (or create) the database at the given path.
    ///
    /// Creates parent directories as needed, enables WAL mode and foreign
    /// keys, and applies the schema. Safe to call on an existing database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(schema::SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Acquire the connection guard, mapping lock poisoning to an error.
    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            Error::Internal(format!(
                "database connection mutex poisoned \
                 (a thread panicked while holding the lock): {e}"
            ))
        })
    }

    /// Path of the underlying database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Row counts for every durable table.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.connection()?;
        Ok(StoreStats {
            articles: count_rows(&conn, "articles")?,
            journals: count_rows(&conn, "journals")?,
            authors: count_rows(&conn, "authors")?,
            citations: count_rows(&conn, "citations")?,
            grants: count_rows(&conn, "grants")?,
            keywords: count_rows(&conn, "article_keywords")?,
        })
    }

    /// Refresh SQLite's query-planner statistics.
    pub fn analyze(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch("ANALYZE;")?;
        Ok(())
    }

    /// Reclaim unused space in the database file.
    pub fn vacuum(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch("VACUUM;")?;
        Ok(())
    }

    /// Dump every user table as ordered rows.
    ///
    /// The dump covers all tables in the database, the cache table included
    /// when it exists. Rows are ordered by every column in ordinal position,
    /// so two snapshots compare equal exactly when the stored state is
    /// equivalent regardless of insertion order.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        let conn = self.connection()?;

        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut tables = BTreeMap::new();
        for name in names {
            let rows = dump_table(&conn, &name)?;
            tables.insert(name, rows);
        }
        Ok(StoreSnapshot { tables })
    }
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM \"{table}\"");
    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(Into::into)
}

fn dump_table(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let ncols = conn
        .prepare(&format!("SELECT * FROM \"{table}\" LIMIT 0"))?
        .column_count();
    let order = (1..=ncols)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut stmt = conn.prepare(&format!("SELECT * FROM \"{table}\" ORDER BY {order}"))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut fields = Vec::with_capacity(ncols);
        for i in 0..ncols {
            fields.push(render_value(row.get_ref(i)?));
        }
        out.push(fields.join("|"));
    }
    Ok(out)
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}
