//! Author-centric queries.
//!
//! Authors are keyed by name pair only. That key is ambiguous (two people
//! can share a name) and every query here deliberately treats all matches
//! as one logical author, so ranking and link queries agree with each other.

use rusqlite::params;

use crate::error::Result;
use crate::store::Store;
use crate::types::AuthorKey;

impl Store {
    /// Pmids of every article authored under this name pair, sorted.
    pub fn articles_by_author(&self, author: &AuthorKey) -> Result<Vec<i64>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT aa.article_pmid FROM article_authors aa \
             JOIN authors a ON a.id = aa.author_id \
             WHERE a.fore_name = ?1 AND a.last_name = ?2 \
             ORDER BY aa.article_pmid",
        )?;
        let pmids = stmt
            .query_map(params![author.fore_name, author.last_name], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(pmids)
    }

    /// Title of the journal carrying most of this author's articles.
    ///
    /// Ties break toward the lexicographically smaller title so the answer
    /// is deterministic. Returns `None` for an unknown author or one whose
    /// articles carry no journal link.
    pub fn top_journal_by_author(&self, author: &AuthorKey) -> Result<Option<String>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT j.title FROM journals j \
             JOIN article_journal aj ON aj.journal_id = j.id \
             JOIN article_authors aa ON aa.article_pmid = aj.article_pmid \
             JOIN authors a ON a.id = aa.author_id \
             WHERE a.fore_name = ?1 AND a.last_name = ?2 \
             GROUP BY j.id \
             ORDER BY COUNT(*) DESC, j.title ASC \
             LIMIT 1",
        )?;
        let mut rows = stmt.query(params![author.fore_name, author.last_name])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{author, journal, sample_article, temp_store};
    use crate::types::Article;

    #[test]
    fn articles_by_author_returns_sorted_pmids() {
        let (_dir, store) = temp_store();
        for pmid in [30, 10, 20] {
            store
                .insert_article(&Article {
                    authors: vec![author("Grace", "Hopper")],
                    ..sample_article(pmid, 2021)
                })
                .unwrap();
        }
        store.insert_article(&sample_article(40, 2021)).unwrap();

        let key = AuthorKey::new("Grace", "Hopper");
        assert_eq!(store.articles_by_author(&key).unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn unknown_author_has_no_articles() {
        let (_dir, store) = temp_store();
        let key = AuthorKey::new("No", "Body");
        assert!(store.articles_by_author(&key).unwrap().is_empty());
    }

    #[test]
    fn top_journal_picks_most_frequent() {
        let (_dir, store) = temp_store();
        let by_grace = |pmid: i64, jid: &str, title: &str| Article {
            authors: vec![author("Grace", "Hopper")],
            journal: Some(journal(jid, title)),
            ..sample_article(pmid, 2021)
        };
        store.insert_article(&by_grace(1, "j-a", "Annals")).unwrap();
        store.insert_article(&by_grace(2, "j-a", "Annals")).unwrap();
        store.insert_article(&by_grace(3, "j-b", "Bulletin")).unwrap();

        let key = AuthorKey::new("Grace", "Hopper");
        assert_eq!(
            store.top_journal_by_author(&key).unwrap(),
            Some("Annals".to_string())
        );
    }

    #[test]
    fn top_journal_breaks_ties_by_title() {
        let (_dir, store) = temp_store();
        let by_grace = |pmid: i64, jid: &str, title: &str| Article {
            authors: vec![author("Grace", "Hopper")],
            journal: Some(journal(jid, title)),
            ..sample_article(pmid, 2021)
        };
        store.insert_article(&by_grace(1, "j-z", "Zygote")).unwrap();
        store.insert_article(&by_grace(2, "j-a", "Annals")).unwrap();

        let key = AuthorKey::new("Grace", "Hopper");
        assert_eq!(
            store.top_journal_by_author(&key).unwrap(),
            Some("Annals".to_string())
        );
    }

    #[test]
    fn top_journal_for_unknown_author_is_none() {
        let (_dir, store) = temp_store();
        let key = AuthorKey::new("No", "Body");
        assert_eq!(store.top_journal_by_author(&key).unwrap(), None);
    }
}
