//! Database schema definition for Hypatia.
//!
//! The durable bibliography lives here. The citation-count cache table is
//! deliberately absent: its lifecycle (create on first use, drop on teardown)
//! belongs to `CitationCache`, not the durable schema.

/// Database schema definition.
pub(crate) const SCHEMA: &str = r"
-- Article records, one row per pmid
CREATE TABLE IF NOT EXISTS articles (
    pmid INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    pub_model TEXT NOT NULL,
    created TEXT NOT NULL,
    completed TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_completed ON articles(completed);

-- Journals, created implicitly by the first article that references them
CREATE TABLE IF NOT EXISTS journals (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    country TEXT NOT NULL DEFAULT '',
    issn TEXT NOT NULL DEFAULT '',
    volume TEXT NOT NULL DEFAULT '',
    issue TEXT NOT NULL DEFAULT ''
);

-- Article -> journal link (an article appears in at most one journal)
CREATE TABLE IF NOT EXISTS article_journal (
    article_pmid INTEGER PRIMARY KEY REFERENCES articles(pmid) ON DELETE CASCADE,
    journal_id TEXT NOT NULL REFERENCES journals(id)
);

CREATE INDEX IF NOT EXISTS idx_article_journal_journal ON article_journal(journal_id);

-- Authors, deduplicated by name pair
CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY,
    fore_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    initials TEXT NOT NULL DEFAULT '',
    UNIQUE (fore_name, last_name)
);

CREATE TABLE IF NOT EXISTS article_authors (
    article_pmid INTEGER NOT NULL REFERENCES articles(pmid) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    PRIMARY KEY (article_pmid, author_id)
);

CREATE INDEX IF NOT EXISTS idx_article_authors_author ON article_authors(author_id);

-- Citation edges, citing -> cited. cited_pmid has no foreign key on purpose:
-- articles routinely cite works that are not (yet) in the store.
CREATE TABLE IF NOT EXISTS citations (
    citing_pmid INTEGER NOT NULL REFERENCES articles(pmid) ON DELETE CASCADE,
    cited_pmid INTEGER NOT NULL,
    PRIMARY KEY (citing_pmid, cited_pmid)
);

CREATE INDEX IF NOT EXISTS idx_citations_cited ON citations(cited_pmid);

-- Keyword links, exact strings
CREATE TABLE IF NOT EXISTS article_keywords (
    article_pmid INTEGER NOT NULL REFERENCES articles(pmid) ON DELETE CASCADE,
    keyword TEXT NOT NULL,
    PRIMARY KEY (article_pmid, keyword)
);

CREATE INDEX IF NOT EXISTS idx_article_keywords_keyword ON article_keywords(keyword);

-- Grants, deduplicated by (grant_id, agency, country)
CREATE TABLE IF NOT EXISTS grants (
    id INTEGER PRIMARY KEY,
    grant_id TEXT NOT NULL DEFAULT '',
    agency TEXT NOT NULL DEFAULT '',
    country TEXT NOT NULL DEFAULT '',
    UNIQUE (grant_id, agency, country)
);

CREATE INDEX IF NOT EXISTS idx_grants_country ON grants(country);

CREATE TABLE IF NOT EXISTS article_grants (
    article_pmid INTEGER NOT NULL REFERENCES articles(pmid) ON DELETE CASCADE,
    grant_id INTEGER NOT NULL REFERENCES grants(id) ON DELETE CASCADE,
    PRIMARY KEY (article_pmid, grant_id)
);

CREATE INDEX IF NOT EXISTS idx_article_grants_grant ON article_grants(grant_id);
";
