//! Journal queries and the year-scoped rename migration.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::store::helpers::{row_to_journal, JOURNAL_COLUMNS};
use crate::store::Store;
use crate::types::Journal;

/// Pmids of a journal's articles completed in the inclusive year range,
/// on an open connection.
pub(crate) fn journal_articles_completed_between_in(
    conn: &Connection,
    journal_id: &str,
    from_year: i32,
    to_year: i32,
) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT a.pmid FROM articles a \
         JOIN article_journal aj ON aj.article_pmid = a.pmid \
         WHERE aj.journal_id = ?1 \
           AND CAST(strftime('%Y', a.completed) AS INTEGER) BETWEEN ?2 AND ?3 \
         ORDER BY a.pmid",
    )?;
    let pmids = stmt
        .query_map(params![journal_id, from_year, to_year], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(pmids)
}

impl Store {
    /// Fetch a journal by id.
    pub fn get_journal(&self, id: &str) -> Result<Option<Journal>> {
        let conn = self.connection()?;
        let sql = format!("SELECT {JOURNAL_COLUMNS} FROM journals WHERE id = ?1");
        conn.query_row(&sql, params![id], row_to_journal)
            .optional()
            .map_err(Into::into)
    }

    /// Number of articles currently linked to a journal.
    pub fn journal_article_count(&self, id: &str) -> Result<i64> {
        let conn = self.connection()?;
        conn.query_row(
            "SELECT COUNT(*) FROM article_journal WHERE journal_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(Into::into)
    }

    /// Pmids of a journal's articles completed in the inclusive year range.
    pub fn journal_articles_completed_between(
        &self,
        journal_id: &str,
        from_year: i32,
        to_year: i32,
    ) -> Result<Vec<i64>> {
        let conn = self.connection()?;
        journal_articles_completed_between_in(&conn, journal_id, from_year, to_year)
    }

    /// Migrate a journal's recent articles to a renamed journal.
    ///
    /// Creates the target journal under `new_id` with title `new_name` if it
    /// does not already exist (country and ISSN carry over from the source),
    /// then repoints the article-journal links of every article completed in
    /// or after `year`. Links for earlier years stay on the source journal.
    ///
    /// Returns `Ok(true)` when at least one link migrated. An absent source
    /// journal or an empty migration set reports `Ok(false)` and leaves the
    /// store untouched.
    pub fn update_journal_name(
        &self,
        journal_id: &str,
        year: i32,
        new_name: &str,
        new_id: &str,
    ) -> Result<bool> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        let source = {
            let sql = format!("SELECT {JOURNAL_COLUMNS} FROM journals WHERE id = ?1");
            tx.query_row(&sql, params![journal_id], row_to_journal)
                .optional()?
        };
        let Some(source) = source else {
            tracing::warn!(journal_id, "journal rename requested for unknown journal");
            return Ok(false);
        };

        let target_exists: bool = tx
            .query_row("SELECT 1 FROM journals WHERE id = ?1", params![new_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !target_exists {
            tx.execute(
                "INSERT INTO journals (id, title, country, issn) VALUES (?1, ?2, ?3, ?4)",
                params![new_id, new_name, source.country, source.issn],
            )?;
        }

        let migrated = tx.execute(
            "UPDATE article_journal SET journal_id = ?1 \
             WHERE journal_id = ?2 AND article_pmid IN \
               (SELECT pmid FROM articles \
                WHERE CAST(strftime('%Y', completed) AS INTEGER) >= ?3)",
            params![new_id, journal_id, year],
        )?;

        if migrated == 0 {
            if !target_exists {
                tx.execute("DELETE FROM journals WHERE id = ?1", params![new_id])?;
            }
            tracing::debug!(
                journal_id,
                year,
                "journal rename matched no articles, nothing migrated"
            );
            tx.commit()?;
            return Ok(false);
        }

        tx.commit()?;
        tracing::info!(
            from = journal_id,
            to = new_id,
            year,
            migrated,
            "migrated article links to renamed journal"
        );
        Ok(true)
    }
}
