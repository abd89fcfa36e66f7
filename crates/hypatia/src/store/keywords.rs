//! Keyword queries.

use rusqlite::params;

use crate::error::Result;
use crate::store::Store;

impl Store {
    /// Number of articles tagged with a keyword, bucketed by completion
    /// year, most recent year first.
    ///
    /// Keyword matching is exact. Years without any tagged article are
    /// simply absent from the result.
    pub fn keyword_counts_by_year(&self, keyword: &str) -> Result<Vec<(i32, i64)>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT CAST(strftime('%Y', a.completed) AS INTEGER) AS year, COUNT(*) \
             FROM articles a \
             JOIN article_keywords ak ON ak.article_pmid = a.pmid \
             WHERE ak.keyword = ?1 \
             GROUP BY year \
             ORDER BY year DESC",
        )?;
        let counts = stmt
            .query_map(params![keyword], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<(i32, i64)>>>()?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::test_support::{sample_article, temp_store};
    use crate::types::Article;

    fn tagged(pmid: i64, year: i32, keyword: &str) -> Article {
        Article {
            keywords: vec![keyword.to_string()],
            ..sample_article(pmid, year)
        }
    }

    #[test]
    fn counts_group_by_completion_year_descending() {
        let (_dir, store) = temp_store();
        store.insert_article(&tagged(1, 2020, "crispr")).unwrap();
        store.insert_article(&tagged(2, 2021, "crispr")).unwrap();
        store.insert_article(&tagged(3, 2021, "crispr")).unwrap();
        store.insert_article(&tagged(4, 2021, "virology")).unwrap();

        let counts = store.keyword_counts_by_year("crispr").unwrap();
        assert_eq!(counts, vec![(2021, 2), (2020, 1)]);
    }

    #[test]
    fn unknown_keyword_yields_empty_counts() {
        let (_dir, store) = temp_store();
        store.insert_article(&tagged(1, 2020, "crispr")).unwrap();
        assert!(store.keyword_counts_by_year("phlogiston").unwrap().is_empty());
    }

    #[test]
    fn matching_is_exact_not_substring() {
        let (_dir, store) = temp_store();
        store.insert_article(&tagged(1, 2020, "gene editing")).unwrap();
        assert!(store.keyword_counts_by_year("gene").unwrap().is_empty());
    }
}
