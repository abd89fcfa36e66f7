//! Article storage: insert, delete, fetch and the citation adjacency.
//!
//! Insert and delete have connection-level variants (`*_in`) so the lifecycle
//! coordinator can run both inside one transaction it controls. The
//! [`InsertOutcome`] returned by insertion records exactly which shared rows
//! (journal, authors, grants) the call created, which is what a later revert
//! needs to restore the store to its prior state.

use std::collections::{BTreeSet, HashMap};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::store::helpers::{row_to_article, row_to_journal, ARTICLE_COLUMNS, JOURNAL_COLUMNS};
use crate::store::Store;
use crate::types::{Article, Author, Grant, Pmid};

/// Which shared rows an article insertion created.
///
/// Journals, authors and grants are shared across articles and upserted on
/// insert. A revert may only remove the ones this call created, and only if
/// no other article still links to them.
#[derive(Debug, Default)]
pub(crate) struct InsertOutcome {
    /// The article's journal row was created by this insertion.
    pub(crate) journal_created: bool,
    /// Author rows created by this insertion.
    pub(crate) created_authors: Vec<i64>,
    /// Grant rows created by this insertion.
    pub(crate) created_grants: Vec<i64>,
}

/// Insert an article and all its linkage on an open connection.
///
/// The journal is upserted by id, never duplicated. Authors are deduplicated
/// by name pair, grants by (grant id, agency, country). Duplicate pmids in
/// the reference list collapse to a single citation edge. Fails on a
/// duplicate article pmid.
pub(crate) fn insert_article_in(conn: &Connection, article: &Article) -> Result<InsertOutcome> {
    let mut outcome = InsertOutcome::default();
    let pmid = article.pmid.as_i64();

    conn.execute(
        "INSERT INTO articles (pmid, title, pub_model, created, completed) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            pmid,
            article.title,
            article.pub_model.as_str(),
            article.created.to_string(),
            article.completed.to_string(),
        ],
    )?;

    if let Some(journal) = &article.journal {
        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM journals WHERE id = ?1",
                params![journal.id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            let (volume, issue) = journal
                .issue
                .as_ref()
                .map_or(("", ""), |i| (i.volume.as_str(), i.issue.as_str()));
            conn.execute(
                "INSERT INTO journals (id, title, country, issn, volume, issue) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![journal.id, journal.title, journal.country, journal.issn, volume, issue],
            )?;
            outcome.journal_created = true;
        }
        conn.execute(
            "INSERT INTO article_journal (article_pmid, journal_id) VALUES (?1, ?2)",
            params![pmid, journal.id],
        )?;
    }

    for author in &article.authors {
        let author_id = upsert_author(conn, author, &mut outcome)?;
        conn.execute(
            "INSERT OR IGNORE INTO article_authors (article_pmid, author_id) VALUES (?1, ?2)",
            params![pmid, author_id],
        )?;
    }

    {
        let mut stmt = conn.prepare(
            "INSERT OR IGNORE INTO article_keywords (article_pmid, keyword) VALUES (?1, ?2)",
        )?;
        for keyword in &article.keywords {
            stmt.execute(params![pmid, keyword])?;
        }
    }

    for grant in &article.grants {
        let grant_id = upsert_grant(conn, grant, &mut outcome)?;
        conn.execute(
            "INSERT OR IGNORE INTO article_grants (article_pmid, grant_id) VALUES (?1, ?2)",
            params![pmid, grant_id],
        )?;
    }

    {
        let mut stmt = conn
            .prepare("INSERT INTO citations (citing_pmid, cited_pmid) VALUES (?1, ?2)")?;
        for cited in deduped_references(article) {
            stmt.execute(params![pmid, cited])?;
        }
    }

    Ok(outcome)
}

/// Delete an article and all its linkage on an open connection.
///
/// Removes linkage rows, citation edges and the article itself, then cleans
/// up shared rows the matching insertion created if nothing links to them
/// anymore. The journal is only deleted when it was created by that
/// insertion and has no remaining articles.
pub(crate) fn delete_article_in(
    conn: &Connection,
    article: &Article,
    outcome: &InsertOutcome,
) -> Result<()> {
    let pmid = article.pmid.as_i64();

    conn.execute(
        "DELETE FROM article_authors WHERE article_pmid = ?1",
        params![pmid],
    )?;
    conn.execute(
        "DELETE FROM article_keywords WHERE article_pmid = ?1",
        params![pmid],
    )?;
    conn.execute(
        "DELETE FROM article_grants WHERE article_pmid = ?1",
        params![pmid],
    )?;
    conn.execute(
        "DELETE FROM citations WHERE citing_pmid = ?1",
        params![pmid],
    )?;
    conn.execute(
        "DELETE FROM article_journal WHERE article_pmid = ?1",
        params![pmid],
    )?;
    conn.execute("DELETE FROM articles WHERE pmid = ?1", params![pmid])?;

    for author_id in &outcome.created_authors {
        conn.execute(
            "DELETE FROM authors WHERE id = ?1 AND NOT EXISTS \
             (SELECT 1 FROM article_authors WHERE author_id = ?1)",
            params![author_id],
        )?;
    }
    for grant_id in &outcome.created_grants {
        conn.execute(
            "DELETE FROM grants WHERE id = ?1 AND NOT EXISTS \
             (SELECT 1 FROM article_grants WHERE grant_id = ?1)",
            params![grant_id],
        )?;
    }

    if outcome.journal_created {
        if let Some(journal) = &article.journal {
            conn.execute(
                "DELETE FROM journals WHERE id = ?1 AND NOT EXISTS \
                 (SELECT 1 FROM article_journal WHERE journal_id = ?1)",
                params![journal.id],
            )?;
        }
    }

    Ok(())
}

/// Whether an article with this pmid exists, on an open connection.
pub(crate) fn article_exists_in(conn: &Connection, pmid: Pmid) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM articles WHERE pmid = ?1",
            params![pmid.as_i64()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn upsert_author(conn: &Connection, author: &Author, outcome: &mut InsertOutcome) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM authors WHERE fore_name = ?1 AND last_name = ?2",
            params![author.fore_name, author.last_name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO authors (fore_name, last_name, initials) VALUES (?1, ?2, ?3)",
        params![author.fore_name, author.last_name, author.initials],
    )?;
    let id = conn.last_insert_rowid();
    outcome.created_authors.push(id);
    Ok(id)
}

fn upsert_grant(conn: &Connection, grant: &Grant, outcome: &mut InsertOutcome) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM grants WHERE grant_id = ?1 AND agency = ?2 AND country = ?3",
            params![grant.grant_id, grant.agency, grant.country],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO grants (grant_id, agency, country) VALUES (?1, ?2, ?3)",
        params![grant.grant_id, grant.agency, grant.country],
    )?;
    let id = conn.last_insert_rowid();
    outcome.created_grants.push(id);
    Ok(id)
}

/// The article's reference list with duplicates removed, in sorted order.
pub(crate) fn deduped_references(article: &Article) -> Vec<i64> {
    article
        .references
        .iter()
        .map(|p| p.as_i64())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl Store {
    /// Insert an article with all its linkage in one transaction.
    pub fn insert_article(&self, article: &Article) -> Result<()> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        insert_article_in(&tx, article)?;
        tx.commit()?;
        Ok(())
    }

    /// Whether an article with this pmid exists.
    pub fn article_exists(&self, pmid: Pmid) -> Result<bool> {
        let conn = self.connection()?;
        article_exists_in(&conn, pmid)
    }

    /// Fetch an article with all its linkage assembled.
    ///
    /// Returns `None` when the pmid is absent. Authors, keywords, references
    /// and grants come back in deterministic sorted order.
    pub fn get_article(&self, pmid: Pmid) -> Result<Option<Article>> {
        let conn = self.connection()?;
        let id = pmid.as_i64();

        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE pmid = ?1");
        let Some(mut article) = conn
            .query_row(&sql, params![id], row_to_article)
            .optional()?
        else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT a.fore_name, a.last_name, a.initials FROM authors a \
             JOIN article_authors aa ON aa.author_id = a.id \
             WHERE aa.article_pmid = ?1 \
             ORDER BY a.last_name, a.fore_name",
        )?;
        article.authors = stmt
            .query_map(params![id], |row| {
                Ok(Author {
                    fore_name: row.get(0)?,
                    last_name: row.get(1)?,
                    initials: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
            "SELECT keyword FROM article_keywords WHERE article_pmid = ?1 ORDER BY keyword",
        )?;
        article.keywords = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
            "SELECT cited_pmid FROM citations WHERE citing_pmid = ?1 ORDER BY cited_pmid",
        )?;
        article.references = stmt
            .query_map(params![id], |row| row.get(0).map(Pmid))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
            "SELECT g.grant_id, g.agency, g.country FROM grants g \
             JOIN article_grants ag ON ag.grant_id = g.id \
             WHERE ag.article_pmid = ?1 \
             ORDER BY g.grant_id, g.agency, g.country",
        )?;
        article.grants = stmt
            .query_map(params![id], |row| {
                Ok(Grant {
                    grant_id: row.get(0)?,
                    agency: row.get(1)?,
                    country: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let sql = format!(
            "SELECT {JOURNAL_COLUMNS} FROM journals \
             WHERE id = (SELECT journal_id FROM article_journal WHERE article_pmid = ?1)"
        );
        article.journal = conn.query_row(&sql, params![id], row_to_journal).optional()?;

        Ok(Some(article))
    }

    /// The full citation adjacency: citing pmid → cited pmids.
    ///
    /// One bulk query; traversals then run against local state without
    /// touching the database per frontier node.
    pub fn citing_adjacency(&self) -> Result<HashMap<i64, Vec<i64>>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT citing_pmid, cited_pmid FROM citations ORDER BY citing_pmid, cited_pmid",
        )?;
        let mut rows = stmt.query([])?;
        let mut adjacency: HashMap<i64, Vec<i64>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let citing: i64 = row.get(0)?;
            let cited: i64 = row.get(1)?;
            adjacency.entry(citing).or_default().push(cited);
        }
        Ok(adjacency)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::store::test_support::{author, journal, sample_article, temp_store};
    use crate::types::{Journal, JournalIssue};

    #[test]
    fn insert_then_get_roundtrips_linkage() {
        let (_dir, store) = temp_store();
        let article = Article {
            authors: vec![author("Ada", "Lovelace"), author("Charles", "Babbage")],
            keywords: vec!["analytical engine".to_string(), "computation".to_string()],
            journal: Some(Journal {
                issue: Some(JournalIssue {
                    volume: "82".to_string(),
                    issue: "4".to_string(),
                }),
                ..journal("j-taylor", "Taylor's Scientific Memoirs")
            }),
            references: vec![Pmid(900), Pmid(300), Pmid(900)],
            grants: vec![Grant {
                grant_id: "RS-1842".to_string(),
                agency: "Royal Society".to_string(),
                country: "United Kingdom".to_string(),
            }],
            ..sample_article(1, 2021)
        };
        store.insert_article(&article).unwrap();

        let fetched = store.get_article(Pmid(1)).unwrap().unwrap();
        assert_eq!(fetched.title, article.title);
        assert_eq!(fetched.authors.len(), 2);
        assert_eq!(fetched.authors[0].last_name, "Babbage");
        assert_eq!(fetched.keywords, article.keywords);
        // Duplicate reference collapsed, rest sorted.
        assert_eq!(fetched.references, vec![Pmid(300), Pmid(900)]);
        assert_eq!(fetched.grants.len(), 1);
        let j = fetched.journal.unwrap();
        assert_eq!(j.id, "j-taylor");
        assert_eq!(j.issue.unwrap().volume, "82");
    }

    #[test]
    fn get_absent_article_returns_none() {
        let (_dir, store) = temp_store();
        assert!(store.get_article(Pmid(404)).unwrap().is_none());
    }

    #[test]
    fn duplicate_pmid_insert_fails() {
        let (_dir, store) = temp_store();
        store.insert_article(&sample_article(7, 2020)).unwrap();
        assert!(store.insert_article(&sample_article(7, 2021)).is_err());
    }

    #[test]
    fn journal_is_upserted_not_duplicated() {
        let (_dir, store) = temp_store();
        let with_journal = |pmid: i64| Article {
            journal: Some(journal("j-nature", "Nature")),
            ..sample_article(pmid, 2021)
        };
        store.insert_article(&with_journal(1)).unwrap();
        store.insert_article(&with_journal(2)).unwrap();

        assert_eq!(store.stats().unwrap().journals, 1);
    }

    #[test]
    fn authors_are_shared_across_articles() {
        let (_dir, store) = temp_store();
        let by_ada = |pmid: i64| Article {
            authors: vec![author("Ada", "Lovelace")],
            ..sample_article(pmid, 2021)
        };
        store.insert_article(&by_ada(1)).unwrap();
        store.insert_article(&by_ada(2)).unwrap();

        assert_eq!(store.stats().unwrap().authors, 1);
    }

    #[test]
    fn insert_failure_rolls_back_whole_article() {
        let (_dir, store) = temp_store();
        store.insert_article(&sample_article(1, 2020)).unwrap();
        let before = store.snapshot().unwrap();

        let dup = Article {
            authors: vec![author("New", "Author")],
            references: vec![Pmid(99)],
            ..sample_article(1, 2021)
        };
        assert!(store.insert_article(&dup).is_err());
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn delete_in_restores_prior_snapshot() {
        let (_dir, store) = temp_store();
        store
            .insert_article(&Article {
                authors: vec![author("Shared", "Author")],
                ..sample_article(1, 2020)
            })
            .unwrap();
        let before = store.snapshot().unwrap();

        let incoming = Article {
            authors: vec![author("Shared", "Author"), author("Fresh", "Face")],
            keywords: vec!["bfs".to_string()],
            journal: Some(journal("j-new", "Brand New Journal")),
            references: vec![Pmid(1), Pmid(42)],
            grants: vec![Grant {
                grant_id: "G-1".to_string(),
                agency: "NSF".to_string(),
                country: "USA".to_string(),
            }],
            ..sample_article(2, 2021)
        };
        {
            let mut conn = store.connection().unwrap();
            let tx = conn.transaction().unwrap();
            let outcome = insert_article_in(&tx, &incoming).unwrap();
            assert!(outcome.journal_created);
            assert_eq!(outcome.created_authors.len(), 1);
            delete_article_in(&tx, &incoming, &outcome).unwrap();
            tx.commit().unwrap();
        }

        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn delete_in_keeps_preexisting_journal() {
        let (_dir, store) = temp_store();
        store
            .insert_article(&Article {
                journal: Some(journal("j-old", "Old Journal")),
                ..sample_article(1, 2020)
            })
            .unwrap();

        let incoming = Article {
            journal: Some(journal("j-old", "Old Journal")),
            ..sample_article(2, 2021)
        };
        {
            let mut conn = store.connection().unwrap();
            let tx = conn.transaction().unwrap();
            let outcome = insert_article_in(&tx, &incoming).unwrap();
            assert!(!outcome.journal_created);
            delete_article_in(&tx, &incoming, &outcome).unwrap();
            tx.commit().unwrap();
        }

        assert_eq!(store.stats().unwrap().journals, 1);
    }

    #[test]
    fn citing_adjacency_groups_out_edges() {
        let (_dir, store) = temp_store();
        store
            .insert_article(&Article {
                references: vec![Pmid(2), Pmid(3)],
                ..sample_article(1, 2021)
            })
            .unwrap();
        store
            .insert_article(&Article {
                references: vec![Pmid(3)],
                ..sample_article(2, 2021)
            })
            .unwrap();

        let adjacency = store.citing_adjacency().unwrap();
        assert_eq!(adjacency[&1], vec![2, 3]);
        assert_eq!(adjacency[&2], vec![3]);
        assert!(!adjacency.contains_key(&3));
    }

    #[test]
    fn deduped_references_sorts_and_collapses() {
        let article = Article {
            references: vec![Pmid(5), Pmid(2), Pmid(5), Pmid(9)],
            created: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            ..sample_article(1, 2021)
        };
        assert_eq!(deduped_references(&article), vec![2, 5, 9]);
    }
}
