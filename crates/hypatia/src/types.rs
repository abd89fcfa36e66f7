//! Domain types for the Hypatia citation engine.
//!
//! These types represent the core domain model:
//! - **Entities**: [`Article`], [`Journal`], [`Author`], [`Grant`] (stored in the database)
//! - **Keys**: [`Pmid`], [`AuthorKey`] (typed lookup handles)
//! - **Results**: [`StoreStats`], [`StoreSnapshot`], [`IngestStats`] (operation output)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Article id | `Pmid` newtype over i64 | Signatures mix ids, years and counts; the newtype prevents swaps |
//! | Author identity | `(fore_name, last_name)` pair | Matches the upstream data; ambiguity is documented, not resolved |
//! | `pub_model` | Enum not String | Fixed vocabulary; unknown stored values surface as corruption errors |
//! | Dates | `chrono::NaiveDate` | Completion year drives every aggregation bucket |

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

// ============================================================================
// Strongly-typed ID wrappers
// ============================================================================

/// A strongly-typed article identifier (PubMed id).
///
/// This newtype provides type safety for function signatures that mix article
/// ids with years, counts and deltas, preventing accidental parameter swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pmid(pub i64);

impl Pmid {
    /// Extract the raw i64 value.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for Pmid {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Pmid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Author identity
// ============================================================================

/// The lookup key for an author: fore name plus last name.
///
/// Author identity by name pair is ambiguous by construction: two distinct
/// people can share a name, and the upstream data provides nothing better.
/// Every operation that takes an `AuthorKey` treats all matching rows as one
/// logical author, consistently across ranking and link queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorKey {
    /// Author's fore (given) name.
    pub fore_name: String,
    /// Author's last (family) name.
    pub last_name: String,
}

impl AuthorKey {
    /// Build a key from name parts.
    pub fn new(fore_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            fore_name: fore_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl std::fmt::Display for AuthorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.fore_name, self.last_name)
    }
}

/// An author as attached to an article record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Fore (given) name.
    pub fore_name: String,
    /// Last (family) name.
    pub last_name: String,
    /// Name initials, empty when the source record omits them.
    #[serde(default)]
    pub initials: String,
}

impl Author {
    /// The ambiguous name-pair key this author is stored and queried under.
    #[must_use]
    pub fn key(&self) -> AuthorKey {
        AuthorKey::new(self.fore_name.clone(), self.last_name.clone())
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Publication model of an article.
///
/// The vocabulary is fixed upstream; values outside it in the database are
/// reported as corruption rather than silently passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PubModel {
    /// Print publication only.
    Print,
    /// Print publication with an electronic edition.
    #[serde(rename = "Print-Electronic")]
    PrintElectronic,
    /// Electronic publication only.
    Electronic,
    /// Electronic publication with a later print edition.
    #[serde(rename = "Electronic-Print")]
    ElectronicPrint,
    /// Electronic publication collected into an eCollection.
    #[serde(rename = "Electronic-eCollection")]
    ElectronicECollection,
}

impl PubModel {
    /// Convert to database string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Print => "Print",
            Self::PrintElectronic => "Print-Electronic",
            Self::Electronic => "Electronic",
            Self::ElectronicPrint => "Electronic-Print",
            Self::ElectronicECollection => "Electronic-eCollection",
        }
    }
}

// ============================================================================
// Core Entities (stored in database)
// ============================================================================

/// A journal issue/volume descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalIssue {
    /// Volume label, empty when unknown.
    #[serde(default)]
    pub volume: String,
    /// Issue label, empty when unknown.
    #[serde(default)]
    pub issue: String,
}

/// A journal.
///
/// Journals are created implicitly by the first article that references them
/// and are upserted by id, never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Unique journal identifier.
    pub id: String,
    /// Journal title.
    pub title: String,
    /// Country of publication, empty when unknown.
    #[serde(default)]
    pub country: String,
    /// ISSN, empty when unknown.
    #[serde(default)]
    pub issn: String,
    /// Optional issue/volume descriptor.
    #[serde(default)]
    pub issue: Option<JournalIssue>,
}

/// A funding record attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Grant identifier as issued by the agency, empty when unknown.
    #[serde(default)]
    pub grant_id: String,
    /// Funding agency name, empty when unknown.
    #[serde(default)]
    pub agency: String,
    /// Funding country, empty when unknown.
    #[serde(default)]
    pub country: String,
}

/// An article record.
///
/// This is both the ingest interchange shape (one JSON object per line) and
/// the assembled result of fetching an article with its linkage. The
/// completion date drives every year-bucketed aggregation; the reference list
/// holds the pmids of cited articles, which need not exist in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Primary identifier (PubMed id).
    pub pmid: Pmid,
    /// Article title.
    pub title: String,
    /// Authors in record order.
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Keywords, exact strings.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// The journal this article appeared in, if any.
    #[serde(default)]
    pub journal: Option<Journal>,
    /// Outgoing citation edges: pmids of the articles this one cites.
    #[serde(default)]
    pub references: Vec<Pmid>,
    /// Grants funding this article.
    #[serde(default)]
    pub grants: Vec<Grant>,
    /// Date the record was created.
    pub created: NaiveDate,
    /// Date the record was completed.
    pub completed: NaiveDate,
    /// Publication model.
    pub pub_model: PubModel,
}

impl Article {
    /// Completion year, the bucket key for every citation aggregation.
    #[must_use]
    pub fn completed_year(&self) -> i32 {
        self.completed.year()
    }
}

// ============================================================================
// Operation Results
// ============================================================================

/// Row counts for the durable tables.
///
/// Returned by `Store::stats()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of articles.
    pub articles: i64,
    /// Number of journals.
    pub journals: i64,
    /// Number of distinct authors.
    pub authors: i64,
    /// Number of citation edges.
    pub citations: i64,
    /// Number of grant records.
    pub grants: i64,
    /// Number of article-keyword links.
    pub keywords: i64,
}

/// An ordered dump of every row in the database, cache table included.
///
/// Two snapshots compare equal exactly when the stored state is equivalent,
/// which is how the revert guarantee of the add-article simulation is
/// verified. Row ordering is fixed by each table's primary key, so the
/// comparison is insensitive to insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Table name → ordered row renderings.
    pub tables: std::collections::BTreeMap<String, Vec<String>>,
}

/// Statistics from a bulk article load.
///
/// Returned by `Hypatia::load_articles()`.
#[derive(Debug)]
pub struct IngestStats {
    /// Number of articles successfully written.
    pub articles_loaded: usize,
    /// Number of batches committed (transactions).
    pub batches_committed: usize,
    /// How long the load took.
    pub duration: Duration,
    /// Per-record errors (line-level, non-fatal).
    pub errors: Vec<RecordError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmid_roundtrips_raw_value() {
        let id = Pmid::from(8_871_834);
        assert_eq!(id.as_i64(), 8_871_834);
        assert_eq!(id.to_string(), "8871834");
    }

    #[test]
    fn author_key_displays_name_pair() {
        let key = AuthorKey::new("Ada", "Lovelace");
        assert_eq!(key.to_string(), "Ada Lovelace");
    }

    #[test]
    fn author_key_ignores_initials() {
        let a = Author {
            fore_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            initials: "AL".to_string(),
        };
        let b = Author {
            fore_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            initials: String::new(),
        };
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn pub_model_serde_uses_hyphenated_names() {
        let json = serde_json::to_string(&PubModel::PrintElectronic).unwrap();
        assert_eq!(json, "\"Print-Electronic\"");

        let parsed: PubModel = serde_json::from_str("\"Electronic-eCollection\"").unwrap();
        assert_eq!(parsed, PubModel::ElectronicECollection);
    }

    #[test]
    fn article_completed_year_uses_completion_date() {
        let article = Article {
            pmid: Pmid(1),
            title: "On computable numbers".to_string(),
            authors: vec![],
            keywords: vec![],
            journal: None,
            references: vec![],
            grants: vec![],
            created: NaiveDate::from_ymd_opt(2020, 3, 14).unwrap(),
            completed: NaiveDate::from_ymd_opt(2021, 7, 2).unwrap(),
            pub_model: PubModel::Print,
        };
        assert_eq!(article.completed_year(), 2021);
    }

    #[test]
    fn article_deserializes_with_defaults() {
        let json = r#"{
            "pmid": 101,
            "title": "Minimal record",
            "created": "2020-01-01",
            "completed": "2020-06-01",
            "pub_model": "Print"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.pmid, Pmid(101));
        assert!(article.authors.is_empty());
        assert!(article.references.is_empty());
        assert!(article.journal.is_none());
    }
}
