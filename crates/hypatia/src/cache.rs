//! The citation-count cache.
//!
//! A derived aggregate keyed by (cited article, citing completion year),
//! answering "how many times was article X cited in year Y" without
//! re-aggregating the citation graph on every query.
//!
//! ## Lifecycle
//!
//! The cache is lazy. The first [`CitationCache::initialize`] call builds the
//! `citation_counts` table from the durable citation edges in one
//! transaction; a compare-and-set guard guarantees exactly one builder runs
//! under concurrent first access. Callers that arrive while the build is in
//! flight do not block: reads return degraded zero answers until the cache
//! is ready. Dropping the cache drops its table, so a fresh process rebuilds
//! from the store rather than trusting a stale aggregate.
//!
//! ## Consistency contract
//!
//! | Situation | Behavior |
//! |-----------|----------|
//! | Read before initialization | warn, return 0 |
//! | Read of an absent key | 0 (no citations recorded) |
//! | Store failure on read | warn, return 0 |
//! | Store failure on write | warn, no-op |
//! | Decrement of an absent key | error log, no row invented |
//! | Count driven below zero | error log, value kept as-is |
//! | Bulk load after the build | cache invalidated, next read rebuilds |
//!
//! A negative count means an increment/decrement pairing is broken
//! somewhere; clamping it would hide the defect, so it is surfaced instead.
//!
//! Writes are serialized by the store's connection mutex, which makes
//! increments on the same key atomic with respect to each other. The
//! lifecycle coordinator bypasses the public methods and uses the `*_in`
//! variants so its increments and the matching decrements share one
//! transaction.
//!
//! The cache reflects the store as of the build plus explicit increments
//! and decrements. Bulk loads insert citation edges without that pairing,
//! so a completed load invalidates a built cache and the next read
//! rebuilds from the durable edges. Writes that go straight to the store
//! are folded in only on the next rebuild.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::store::Store;
use crate::types::Pmid;

const UNINITIALIZED: u8 = 0;
const BUILDING: u8 = 1;
const READY: u8 = 2;

const CACHE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS citation_counts (
    article_pmid INTEGER NOT NULL,
    citation_year INTEGER NOT NULL,
    citation_count INTEGER NOT NULL,
    PRIMARY KEY (article_pmid, citation_year)
);
";

/// Cached citation counts keyed by (cited article, citing completion year).
pub struct CitationCache {
    store: Arc<Store>,
    state: AtomicU8,
}

impl CitationCache {
    /// Create an uninitialized cache over the given store.
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    /// Whether the cache has been built and is serving real counts.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// Build the cache from the durable citation edges.
    ///
    /// Idempotent: once built, later calls return immediately. Under
    /// concurrent first access exactly one caller performs the build; the
    /// others return right away and read degraded zeros until it finishes.
    /// A failed build releases the claim so a later call can retry.
    pub fn initialize(&self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        match self.state.compare_exchange(
            UNINITIALIZED,
            BUILDING,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => match self.build() {
                Ok(entries) => {
                    self.state.store(READY, Ordering::Release);
                    tracing::info!(entries, "citation count cache built");
                    Ok(())
                }
                Err(e) => {
                    self.state.store(UNINITIALIZED, Ordering::Release);
                    Err(e)
                }
            },
            // Another caller holds the build, or it already completed.
            Err(_) => Ok(()),
        }
    }

    /// Build the cache and wait until it serves real counts.
    ///
    /// Unlike [`CitationCache::initialize`], a caller that loses the build
    /// race yields until the winner finishes instead of proceeding with
    /// degraded reads. A failed build releases the claim, so the loop either
    /// retries the build itself or surfaces its error.
    pub(crate) fn ensure_ready(&self) -> Result<()> {
        self.initialize()?;
        while !self.is_ready() {
            std::thread::yield_now();
            self.initialize()?;
        }
        Ok(())
    }

    /// Discard a completed build so the next read rebuilds from the store.
    ///
    /// Used after bulk loads, which insert citation edges without the
    /// increment/decrement pairing the counts rely on. A no-op while
    /// uninitialized or while a build is in flight.
    pub(crate) fn invalidate(&self) {
        if self
            .state
            .compare_exchange(READY, UNINITIALIZED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            tracing::debug!("citation count cache invalidated, next read rebuilds");
        }
    }

    fn build(&self) -> Result<usize> {
        let mut conn = self.store.connection()?;
        let tx = conn.transaction()?;
        tx.execute_batch(CACHE_SCHEMA)?;
        tx.execute("DELETE FROM citation_counts", [])?;
        let entries = tx.execute(
            "INSERT INTO citation_counts (article_pmid, citation_year, citation_count) \
             SELECT c.cited_pmid, CAST(strftime('%Y', a.completed) AS INTEGER), COUNT(*) \
             FROM citations c \
             JOIN articles a ON a.pmid = c.citing_pmid \
             GROUP BY c.cited_pmid, CAST(strftime('%Y', a.completed) AS INTEGER)",
            [],
        )?;
        tx.commit()?;
        Ok(entries)
    }

    /// Total citations of an article across all years.
    ///
    /// Returns 0 when the cache is not ready, the article is unknown, or the
    /// store is unavailable; failures are logged, never propagated.
    pub fn get(&self, pmid: Pmid) -> i64 {
        if !self.is_ready() {
            tracing::warn!(%pmid, "citation count cache not initialized, returning zero");
            return 0;
        }
        let total = self.store.connection().and_then(|conn| {
            conn.query_row(
                "SELECT COALESCE(SUM(citation_count), 0) FROM citation_counts \
                 WHERE article_pmid = ?1",
                params![pmid.as_i64()],
                |row| row.get(0),
            )
            .map_err(Into::into)
        });
        match total {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(%pmid, error = %e, "citation count lookup failed, returning zero");
                0
            }
        }
    }

    /// Citations of an article received in one specific year.
    ///
    /// Same degradation contract as [`CitationCache::get`].
    pub fn get_in_year(&self, pmid: Pmid, year: i32) -> i64 {
        if !self.is_ready() {
            tracing::warn!(%pmid, year, "citation count cache not initialized, returning zero");
            return 0;
        }
        let count = self
            .store
            .connection()
            .and_then(|conn| get_in_year_in(&conn, pmid, year));
        match count {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(%pmid, year, error = %e, "citation count lookup failed, returning zero");
                0
            }
        }
    }

    /// Add `delta` citations to an article for one year, creating the key
    /// if it is new.
    ///
    /// A no-op (with a warning) when the cache is not ready or the store is
    /// unavailable.
    pub fn increment(&self, pmid: Pmid, year: i32, delta: i64) {
        if !self.is_ready() {
            tracing::warn!(%pmid, year, "citation count cache not initialized, increment skipped");
            return;
        }
        let result = self
            .store
            .connection()
            .and_then(|conn| increment_in(&conn, pmid, year, delta));
        if let Err(e) = result {
            tracing::warn!(%pmid, year, error = %e, "citation count increment failed");
        }
    }

    /// Remove `delta` citations from an article for one year.
    ///
    /// Symmetric to [`CitationCache::increment`]; the count may legitimately
    /// reach zero. Decrementing an absent key or driving a count negative is
    /// reported at error severity and never papered over.
    pub fn decrement(&self, pmid: Pmid, year: i32, delta: i64) {
        if !self.is_ready() {
            tracing::warn!(%pmid, year, "citation count cache not initialized, decrement skipped");
            return;
        }
        let result = self
            .store
            .connection()
            .and_then(|conn| decrement_in(&conn, pmid, year, delta));
        if let Err(e) = result {
            tracing::warn!(%pmid, year, error = %e, "citation count decrement failed");
        }
    }

    /// Number of (article, year) entries currently cached.
    pub fn entry_count(&self) -> Result<i64> {
        let conn = self.store.connection()?;
        conn.query_row("SELECT COUNT(*) FROM citation_counts", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

impl Drop for CitationCache {
    /// Tear the derived table down so the next process rebuilds it from the
    /// durable edges instead of trusting a possibly stale aggregate.
    fn drop(&mut self) {
        if self.state.load(Ordering::Acquire) == UNINITIALIZED {
            return;
        }
        match self.store.connection() {
            Ok(conn) => {
                if let Err(e) = conn.execute_batch("DROP TABLE IF EXISTS citation_counts") {
                    tracing::warn!(error = %e, "failed to drop citation count cache table");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to drop citation count cache table");
            }
        }
    }
}

/// Read one (article, year) count on an open connection. Absent keys are 0.
pub(crate) fn get_in_year_in(conn: &Connection, pmid: Pmid, year: i32) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(citation_count), 0) FROM citation_counts \
         WHERE article_pmid = ?1 AND citation_year = ?2",
        params![pmid.as_i64(), year],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

/// Upsert-increment one (article, year) count on an open connection.
pub(crate) fn increment_in(conn: &Connection, pmid: Pmid, year: i32, delta: i64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE citation_counts SET citation_count = citation_count + ?3 \
         WHERE article_pmid = ?1 AND citation_year = ?2",
        params![pmid.as_i64(), year, delta],
    )?;
    if updated == 0 {
        conn.execute(
            "INSERT INTO citation_counts (article_pmid, citation_year, citation_count) \
             VALUES (?1, ?2, ?3)",
            params![pmid.as_i64(), year, delta],
        )?;
    }
    Ok(())
}

/// Decrement one (article, year) count on an open connection.
///
/// Never invents a row: decrementing a key that was never incremented is a
/// pairing bug and is logged at error severity. So is a count that ends up
/// below zero.
pub(crate) fn decrement_in(conn: &Connection, pmid: Pmid, year: i32, delta: i64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE citation_counts SET citation_count = citation_count - ?3 \
         WHERE article_pmid = ?1 AND citation_year = ?2",
        params![pmid.as_i64(), year, delta],
    )?;
    if updated == 0 {
        tracing::error!(
            %pmid,
            year,
            "citation count decrement hit a missing key; increment/decrement pairing is broken"
        );
        return Ok(());
    }
    let count = get_in_year_in(conn, pmid, year)?;
    if count < 0 {
        tracing::error!(
            %pmid,
            year,
            count,
            "citation count went negative; increment/decrement pairing is broken"
        );
    }
    Ok(())
}
