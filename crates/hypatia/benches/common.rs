//! Shared utilities for Hypatia benchmarks.

// Benchmark utilities - pedantic lints not critical here
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

use chrono::NaiveDate;
use hypatia::{Article, Author, Hypatia, Journal, Pmid, PubModel};
use tempfile::TempDir;

/// An engine over a seeded temporary database, ready for benchmarking.
pub struct SeededEngine {
    /// Temp directory - must be kept alive for the duration of the benchmark.
    pub dir: TempDir,
    /// Engine over the seeded database.
    pub engine: Hypatia,
}

/// A bare article completed mid-`year`, customized per generator.
pub fn article(pmid: i64, year: i32) -> Article {
    Article {
        pmid: Pmid(pmid),
        title: format!("Article {pmid}"),
        authors: Vec::new(),
        keywords: Vec::new(),
        journal: None,
        references: Vec::new(),
        grants: Vec::new(),
        created: NaiveDate::from_ymd_opt(year, 1, 10).expect("valid date"),
        completed: NaiveDate::from_ymd_opt(year, 6, 15).expect("valid date"),
        pub_model: PubModel::Print,
    }
}

pub fn author(fore_name: &str, last_name: &str) -> Author {
    Author {
        fore_name: fore_name.to_string(),
        last_name: last_name.to_string(),
        initials: String::new(),
    }
}

pub fn journal(id: &str, title: &str) -> Journal {
    Journal {
        id: id.to_string(),
        title: title.to_string(),
        country: String::new(),
        issn: String::new(),
        issue: None,
    }
}

/// Create a temporary database and load the given articles into it.
pub fn open_seeded(articles: &[Article]) -> SeededEngine {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let engine = Hypatia::open(dir.path().join("bench.db")).expect("failed to open engine");
    for article in articles {
        engine
            .store()
            .insert_article(article)
            .expect("failed to seed article");
    }
    SeededEngine { dir, engine }
}

/// Like [`open_seeded`], with the citation-count cache already built.
pub fn open_primed(articles: &[Article]) -> SeededEngine {
    let seeded = open_seeded(articles);
    seeded.engine.cache().initialize().expect("initialize failed");
    seeded
}
