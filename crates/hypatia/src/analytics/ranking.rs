//! Per-author citation ranking.

use crate::cache::CitationCache;
use crate::error::Result;
use crate::store::Store;
use crate::types::{AuthorKey, Pmid};

/// Citation counts of an author's articles, sorted descending.
///
/// The output is the counts themselves, one per article, not article
/// identifiers. An author with no articles yields an empty sequence.
pub(crate) fn citation_ranking(
    store: &Store,
    cache: &CitationCache,
    author: &AuthorKey,
) -> Result<Vec<i64>> {
    let mut counts: Vec<i64> = store
        .articles_by_author(author)?
        .into_iter()
        .map(|pmid| cache.get(Pmid(pmid)))
        .collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    Ok(counts)
}
