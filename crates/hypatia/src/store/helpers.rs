//! Shared row-conversion helpers for store queries.

use chrono::NaiveDate;
use rusqlite::Row;

use crate::types::{Article, Journal, JournalIssue, Pmid, PubModel};

/// Column list for article queries. Keep in sync with [`row_to_article`].
pub(crate) const ARTICLE_COLUMNS: &str = "pmid, title, pub_model, created, completed";

/// Column list for journal queries. Keep in sync with [`row_to_journal`].
pub(crate) const JOURNAL_COLUMNS: &str = "id, title, country, issn, volume, issue";

/// Convert a database row into an [`Article`].
///
/// Expects columns in [`ARTICLE_COLUMNS`] order. Linkage (authors, keywords,
/// references, grants, journal) is loaded separately and starts out empty.
pub(crate) fn row_to_article(row: &Row) -> rusqlite::Result<Article> {
    let pub_model: String = row.get(2)?;
    let created: String = row.get(3)?;
    let completed: String = row.get(4)?;
    Ok(Article {
        pmid: Pmid(row.get(0)?),
        title: row.get(1)?,
        authors: Vec::new(),
        keywords: Vec::new(),
        journal: None,
        references: Vec::new(),
        grants: Vec::new(),
        created: parse_stored_date(&created)?,
        completed: parse_stored_date(&completed)?,
        pub_model: parse_pub_model(&pub_model)?,
    })
}

/// Convert a database row into a [`Journal`].
///
/// Expects columns in [`JOURNAL_COLUMNS`] order. Empty volume and issue
/// collapse to `None`, matching how absent issue data is stored.
pub(crate) fn row_to_journal(row: &Row) -> rusqlite::Result<Journal> {
    let volume: String = row.get(4)?;
    let issue: String = row.get(5)?;
    let issue = if volume.is_empty() && issue.is_empty() {
        None
    } else {
        Some(JournalIssue { volume, issue })
    };
    Ok(Journal {
        id: row.get(0)?,
        title: row.get(1)?,
        country: row.get(2)?,
        issn: row.get(3)?,
        issue,
    })
}

/// Parse a publication model string from the database.
pub(crate) fn parse_pub_model(s: &str) -> rusqlite::Result<PubModel> {
    match s {
        "Print" => Ok(PubModel::Print),
        "Print-Electronic" => Ok(PubModel::PrintElectronic),
        "Electronic" => Ok(PubModel::Electronic),
        "Electronic-Print" => Ok(PubModel::ElectronicPrint),
        "Electronic-eCollection" => Ok(PubModel::ElectronicECollection),
        unknown => Err(rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!(
                "Unknown publication model '{unknown}' in database. \
                 Database may be corrupted or from a newer version."
            )
            .into(),
        )),
    }
}

/// Parse an ISO date string from the database.
pub(crate) fn parse_stored_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!(
                "Unparseable date '{s}' in database: {e}. \
                 Database may be corrupted or from a newer version."
            )
            .into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_pub_model_round_trip() {
        for model in [
            PubModel::Print,
            PubModel::PrintElectronic,
            PubModel::Electronic,
            PubModel::ElectronicPrint,
            PubModel::ElectronicECollection,
        ] {
            assert_eq!(parse_pub_model(model.as_str()).unwrap(), model);
        }
    }

    #[test]
    fn rejects_unknown_pub_model() {
        let err = parse_pub_model("Papyrus").unwrap_err();
        assert!(err.to_string().contains("Papyrus"));
    }

    #[test]
    fn parses_iso_dates() {
        let date = parse_stored_date("2021-07-02").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 7, 2).unwrap());
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_stored_date("02/07/2021").is_err());
        assert!(parse_stored_date("").is_err());
    }
}
