//! Grant and funding queries.

use rusqlite::params;

use crate::error::Result;
use crate::store::Store;

impl Store {
    /// Pmids of every article holding at least one grant from the given
    /// funding country, sorted.
    pub fn articles_funded_by_country(&self, country: &str) -> Result<Vec<i64>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT ag.article_pmid FROM article_grants ag \
             JOIN grants g ON g.id = ag.grant_id \
             WHERE g.country = ?1 \
             ORDER BY ag.article_pmid",
        )?;
        let pmids = stmt
            .query_map(params![country], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(pmids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{sample_article, temp_store};
    use crate::types::{Article, Grant};

    fn funded(pmid: i64, country: &str) -> Article {
        Article {
            grants: vec![Grant {
                grant_id: format!("G-{pmid}"),
                agency: "Agency".to_string(),
                country: country.to_string(),
            }],
            ..sample_article(pmid, 2021)
        }
    }

    #[test]
    fn filters_articles_by_funding_country() {
        let (_dir, store) = temp_store();
        store.insert_article(&funded(1, "USA")).unwrap();
        store.insert_article(&funded(2, "Japan")).unwrap();
        store.insert_article(&funded(3, "USA")).unwrap();

        assert_eq!(store.articles_funded_by_country("USA").unwrap(), vec![1, 3]);
        assert_eq!(store.articles_funded_by_country("Japan").unwrap(), vec![2]);
        assert!(store.articles_funded_by_country("France").unwrap().is_empty());
    }

    #[test]
    fn article_with_two_grants_from_same_country_appears_once() {
        let (_dir, store) = temp_store();
        let article = Article {
            grants: vec![
                Grant {
                    grant_id: "G-1".to_string(),
                    agency: "NSF".to_string(),
                    country: "USA".to_string(),
                },
                Grant {
                    grant_id: "G-2".to_string(),
                    agency: "NIH".to_string(),
                    country: "USA".to_string(),
                },
            ],
            ..sample_article(1, 2021)
        };
        store.insert_article(&article).unwrap();

        assert_eq!(store.articles_funded_by_country("USA").unwrap(), vec![1]);
    }
}
