//! # Hypatia
//!
//! Citation-graph analytics over a bibliographic store.
//!
//! Hypatia keeps articles, journals, authors, grants and directed citation
//! edges (citing → cited) in SQLite and answers the questions that need the
//! whole graph: how often an article is cited per year, a journal's impact
//! factor, how far apart two authors are in citation hops, and what a
//! journal's impact factor *would be* if a candidate article were published
//! in it.
//!
//! ## Architecture
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | durable relational state behind a single guarded connection |
//! | `cache` | derived (article, year) → citation-count aggregate, built lazily |
//! | `analytics` | impact factor, author-link BFS, citation ranking |
//! | `coordinator` | the simulate-then-revert add-article operation |
//! | `ingest` | parallel JSON Lines bulk loading |
//!
//! The citation-count cache is the single source of truth for "how many
//! times was article X cited in year Y"; every analytic reads it instead of
//! re-aggregating edges. It initializes itself on first use and degrades to
//! zero answers (with logging) if asked before it is ready.
//!
//! [`Hypatia`] is `Sync`: one instance can serve queries from any number of
//! threads. Writes serialize on the store's connection; reads that miss the
//! cache degrade rather than block.
//!
//! ## Quick start
//!
//! ```no_run
//! use hypatia::{Hypatia, Pmid};
//!
//! let engine = Hypatia::open("bibliography.db")?;
//! engine.load_articles(std::path::Path::new("articles.jsonl"))?;
//!
//! let citations = engine.article_citations_by_year(Pmid(8_871_834), 2021)?;
//! let impact = engine.impact_factor("j-brain-res", 2023)?;
//! # Ok::<(), hypatia::Error>(())
//! ```

mod analytics;
mod cache;
mod coordinator;
mod error;
mod ingest;
pub mod store;
mod types;

use std::path::Path;
use std::sync::Arc;

pub use cache::CitationCache;
pub use error::{Error, RecordError, RecordErrorKind, Result};
pub use store::Store;
pub use types::{
    Article, Author, AuthorKey, Grant, IngestStats, Journal, JournalIssue, Pmid, PubModel,
    StoreSnapshot, StoreStats,
};

/// The citation analytics engine: a store plus its citation-count cache.
pub struct Hypatia {
    store: Arc<Store>,
    cache: CitationCache,
}

impl Hypatia {
    /// Open (or create) the engine over the database at `path`.
    ///
    /// The citation-count cache starts uninitialized and builds itself on
    /// the first operation that needs it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Arc::new(Store::open(path)?);
        let cache = CitationCache::new(Arc::clone(&store));
        Ok(Self { store, cache })
    }

    /// The underlying store, for direct queries.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The citation-count cache.
    #[must_use]
    pub fn cache(&self) -> &CitationCache {
        &self.cache
    }

    // === Citation counts ===

    /// Citations received by an article in one specific year.
    ///
    /// The year is the *citing* article's completion year. Unknown articles
    /// and years without citations answer 0.
    pub fn article_citations_by_year(&self, pmid: Pmid, year: i32) -> Result<i64> {
        self.cache.initialize()?;
        Ok(self.cache.get_in_year(pmid, year))
    }

    /// Total citations received by an article across all years.
    pub fn article_citations(&self, pmid: Pmid) -> Result<i64> {
        self.cache.initialize()?;
        Ok(self.cache.get(pmid))
    }

    // === Impact factor ===

    /// Impact factor of a journal for a target year: citations received in
    /// `year` by the journal's articles completed in the two preceding
    /// years, divided by the number of those articles. 0 when the journal
    /// published nothing in that window.
    pub fn impact_factor(&self, journal_id: &str, year: i32) -> Result<f64> {
        self.cache.initialize()?;
        analytics::impact::impact_factor(&self.store, &self.cache, journal_id, year)
    }

    /// Simulate adding `article` and report the impact factor its journal
    /// would have for the article's completion year.
    ///
    /// The article is inserted, the cache updated, the impact factor
    /// computed from that state, and every effect then reverted inside the
    /// same transaction. The store and cache end bitwise-identical to their
    /// state before the call. Fails on a duplicate pmid, with no partial
    /// state left behind.
    pub fn add_article_and_update_impact_factor(&self, article: &Article) -> Result<f64> {
        coordinator::add_article_and_update_impact_factor(&self.store, &self.cache, article)
    }

    // === Author analytics ===

    /// Citation counts of an author's articles, sorted descending.
    ///
    /// The result is the counts themselves, not article ids. An unknown
    /// author yields an empty sequence.
    pub fn articles_by_author_sorted_by_citations(&self, author: &AuthorKey) -> Result<Vec<i64>> {
        self.cache.initialize()?;
        analytics::ranking::citation_ranking(&self.store, &self.cache, author)
    }

    /// Title of the journal carrying most of an author's articles, or
    /// `None` for an unknown author.
    pub fn journal_with_most_articles_by_author(
        &self,
        author: &AuthorKey,
    ) -> Result<Option<String>> {
        self.store.top_journal_by_author(author)
    }

    /// Minimum citation hops from an article by `author_a` to an article by
    /// `author_b`, following edges citing → cited. Returns -1 when no path
    /// exists. Authors sharing an article are 0 hops apart.
    pub fn min_articles_to_link_authors(
        &self,
        author_a: &AuthorKey,
        author_b: &AuthorKey,
    ) -> Result<i64> {
        let depth = analytics::link::min_links_between(&self.store, author_a, author_b)?;
        Ok(depth.map_or(-1, |d| i64::try_from(d).unwrap_or(i64::MAX)))
    }

    // === Journals ===

    /// Migrate a journal's articles completed in or after `year` to a new
    /// journal id and name. Earlier articles keep their link to the old
    /// journal. Reports whether any link actually migrated.
    pub fn update_journal_name(
        &self,
        journal_id: &str,
        year: i32,
        new_name: &str,
        new_id: &str,
    ) -> Result<bool> {
        self.store.update_journal_name(journal_id, year, new_name, new_id)
    }

    // === Corpus queries ===

    /// Fetch an article with its full linkage, or `None` if absent.
    pub fn article(&self, pmid: Pmid) -> Result<Option<Article>> {
        self.store.get_article(pmid)
    }

    /// Pmids of articles funded by grants from the given country.
    pub fn articles_funded_by_country(&self, country: &str) -> Result<Vec<Pmid>> {
        Ok(self
            .store
            .articles_funded_by_country(country)?
            .into_iter()
            .map(Pmid)
            .collect())
    }

    /// Articles per completion year carrying a keyword, newest year first.
    pub fn keyword_counts_by_year(&self, keyword: &str) -> Result<Vec<(i32, i64)>> {
        self.store.keyword_counts_by_year(keyword)
    }

    // === Maintenance ===

    /// Bulk-load a JSON Lines file of articles (one object per line).
    ///
    /// Bad lines are reported in the returned stats, not fatal. A load
    /// invalidates an already-built citation cache, so the next analytic
    /// query rebuilds counts that include the loaded edges.
    pub fn load_articles(&self, input: &Path) -> Result<IngestStats> {
        let stats = ingest::load_articles(self.store.path(), input, ingest::DEFAULT_BATCH_SIZE)?;
        self.cache.invalidate();
        Ok(stats)
    }

    /// Row counts for the durable tables.
    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    /// Ordered dump of every table, for state-equivalence checks.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        self.store.snapshot()
    }
}
