//! The article lifecycle coordinator: simulate-then-revert.
//!
//! `add_article_and_update_impact_factor` answers "what would this journal's
//! impact factor be if this article were published", without the article
//! ever becoming durable:
//!
//! 1. insert the article and its linkage (journal upserted by id)
//! 2. increment the citation cache for every cited article, keyed by the
//!    new article's completion year
//! 3. compute the journal's impact factor from the post-insertion state
//! 4. decrement the same cache keys by the same amounts and delete the
//!    article again, dropping the journal only if step 1 created it and
//!    nothing else links to it
//! 5. return the impact factor from step 3
//!
//! The whole sequence runs inside one SQLite transaction on the store's
//! single connection. That serializes simulations against every other
//! write, which is stronger than the per-journal exclusivity the revert
//! pattern needs, and it makes the failure contract trivial: any error
//! rolls the transaction back, so no partial state can survive. On success
//! the commit publishes a net-zero effect; before/after snapshots of the
//! store compare equal.

use crate::analytics::impact::impact_factor_in;
use crate::cache::{decrement_in, increment_in, CitationCache};
use crate::error::Result;
use crate::store::articles::{deduped_references, delete_article_in, insert_article_in};
use crate::store::Store;
use crate::types::{Article, Pmid};

/// Simulate inserting `article` and report the resulting impact factor of
/// its journal for its completion year.
///
/// Fails (with full rollback) on a duplicate pmid or any store error. An
/// article without a journal simulates cleanly and reports 0.
pub(crate) fn add_article_and_update_impact_factor(
    store: &Store,
    cache: &CitationCache,
    article: &Article,
) -> Result<f64> {
    // The cache table must exist before the transaction touches it, so a
    // caller racing another thread's build waits for it to finish instead
    // of proceeding degraded. ensure_ready() takes the connection lock
    // itself, so it has to happen before the guard below is acquired.
    cache.ensure_ready()?;

    let year = article.completed_year();
    let cited = deduped_references(article);

    let mut conn = store.connection()?;
    let tx = conn.transaction()?;

    let outcome = insert_article_in(&tx, article)?;
    for &pmid in &cited {
        increment_in(&tx, Pmid(pmid), year, 1)?;
    }

    let impact = match &article.journal {
        Some(journal) => impact_factor_in(&tx, &journal.id, year)?,
        None => {
            tracing::debug!(pmid = %article.pmid, "simulated article has no journal");
            0.0
        }
    };

    for &pmid in &cited {
        decrement_in(&tx, Pmid(pmid), year, 1)?;
    }
    delete_article_in(&tx, article, &outcome)?;

    tx.commit()?;
    tracing::debug!(pmid = %article.pmid, impact, "article insertion simulated and reverted");
    Ok(impact)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::test_support::{author, journal, sample_article, temp_store};
    use crate::types::Grant;

    fn simulation_fixture() -> (tempfile::TempDir, Arc<Store>, CitationCache) {
        let (dir, store) = temp_store();
        let store = Arc::new(store);
        let in_journal = |pmid: i64, year: i32| Article {
            journal: Some(journal("j", "Journal of Results")),
            ..sample_article(pmid, year)
        };
        store.insert_article(&in_journal(1, 2021)).expect("insert");
        store.insert_article(&in_journal(2, 2021)).expect("insert");
        store.insert_article(&in_journal(3, 2022)).expect("insert");
        let cache = CitationCache::new(Arc::clone(&store));
        (dir, store, cache)
    }

    #[test]
    fn reports_post_insertion_impact_factor() {
        let (_dir, store, cache) = simulation_fixture();
        // The incoming 2023 article cites all three journal articles, so the
        // simulated numerator is 3 over a denominator of 3.
        let incoming = Article {
            journal: Some(journal("j", "Journal of Results")),
            references: vec![Pmid(1), Pmid(2), Pmid(3)],
            ..sample_article(100, 2023)
        };
        let impact = add_article_and_update_impact_factor(&store, &cache, &incoming).unwrap();
        assert!((impact - 1.0).abs() < 1e-12);
    }

    #[test]
    fn store_and_cache_are_restored_exactly() {
        let (_dir, store, cache) = simulation_fixture();
        cache.initialize().unwrap();
        let before = store.snapshot().unwrap();

        let incoming = Article {
            journal: Some(journal("j-brand-new", "Fresh Journal")),
            authors: vec![author("New", "Author")],
            keywords: vec!["simulation".to_string()],
            references: vec![Pmid(1), Pmid(2)],
            grants: vec![Grant {
                grant_id: "G-9".to_string(),
                agency: "ERC".to_string(),
                country: "EU".to_string(),
            }],
            ..sample_article(100, 2023)
        };
        add_article_and_update_impact_factor(&store, &cache, &incoming).unwrap();

        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn duplicate_pmid_fails_with_no_partial_state() {
        let (_dir, store, cache) = simulation_fixture();
        cache.initialize().unwrap();
        let before = store.snapshot().unwrap();

        // Pmid 1 already exists.
        let duplicate = Article {
            references: vec![Pmid(2)],
            ..sample_article(1, 2023)
        };
        assert!(add_article_and_update_impact_factor(&store, &cache, &duplicate).is_err());
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn article_without_journal_reports_zero() {
        let (_dir, store, cache) = simulation_fixture();
        let incoming = Article {
            references: vec![Pmid(1)],
            ..sample_article(100, 2023)
        };
        let impact = add_article_and_update_impact_factor(&store, &cache, &incoming).unwrap();
        assert_eq!(impact, 0.0);
    }

    #[test]
    fn repeated_simulations_are_idempotent() {
        let (_dir, store, cache) = simulation_fixture();
        let incoming = Article {
            journal: Some(journal("j", "Journal of Results")),
            references: vec![Pmid(1), Pmid(2), Pmid(3)],
            ..sample_article(100, 2023)
        };
        let first = add_article_and_update_impact_factor(&store, &cache, &incoming).unwrap();
        let second = add_article_and_update_impact_factor(&store, &cache, &incoming).unwrap();
        let third = add_article_and_update_impact_factor(&store, &cache, &incoming).unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn duplicate_references_count_once() {
        let (_dir, store, cache) = simulation_fixture();
        let incoming = Article {
            journal: Some(journal("j", "Journal of Results")),
            references: vec![Pmid(1), Pmid(1), Pmid(1)],
            ..sample_article(100, 2023)
        };
        // One edge to pmid 1, so 1 citation over 3 articles.
        let impact = add_article_and_update_impact_factor(&store, &cache, &incoming).unwrap();
        assert!((impact - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn concurrent_simulations_on_a_cold_cache_all_succeed() {
        let (_dir, store, cache) = simulation_fixture();
        let incoming = Article {
            journal: Some(journal("j", "Journal of Results")),
            references: vec![Pmid(1), Pmid(2), Pmid(3)],
            ..sample_article(100, 2023)
        };

        // Nobody has built the cache yet; racing simulations must wait for
        // whichever thread wins the build rather than hitting a cache table
        // that does not exist yet.
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        add_article_and_update_impact_factor(&store, &cache, &incoming)
                            .expect("simulation failed")
                    })
                })
                .collect();
            for handle in handles {
                let impact = handle.join().expect("simulation thread panicked");
                assert!((impact - 1.0).abs() < 1e-12, "got: {impact}");
            }
        });

        assert!(!store.article_exists(Pmid(100)).expect("exists query failed"));
    }
}
