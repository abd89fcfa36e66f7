//! Bulk article loading from JSON Lines files.
//!
//! One article object per line. Lines are parsed in parallel on the rayon
//! pool and handed to a single writer thread that owns its own database
//! connection and commits in batches. A bad line is recorded with its line
//! number and skipped; it never aborts the rest of the load.
//!
//! ```text
//!   reader ──lines──▶ rayon parse workers ──channel──▶ writer thread
//!                                                      (batched transactions)
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use rayon::iter::{ParallelBridge, ParallelIterator};

use crate::error::{Error, RecordError, Result};
use crate::store::articles::{article_exists_in, insert_article_in};
use crate::store::Store;
use crate::types::{Article, IngestStats};

/// Articles per write transaction.
pub(crate) const DEFAULT_BATCH_SIZE: usize = 512;

struct ParsedLine {
    line: usize,
    result: std::result::Result<Article, RecordError>,
}

struct WriteOutcome {
    loaded: usize,
    batches: usize,
    errors: Vec<RecordError>,
}

/// Load a JSON Lines file of articles into the database at `db_path`.
///
/// Returns per-record errors inside the stats rather than failing the call;
/// only I/O on the input file, a store-level failure, or a writer panic
/// abort the load.
pub(crate) fn load_articles(
    db_path: &Path,
    input: &Path,
    batch_size: usize,
) -> Result<IngestStats> {
    let start = Instant::now();
    let reader = BufReader::new(File::open(input)?);

    let (sender, receiver) = mpsc::channel::<ParsedLine>();
    let writer_path = db_path.to_path_buf();
    let writer =
        thread::spawn(move || write_worker(&writer_path, &receiver, batch_size.max(1)));

    reader
        .lines()
        .enumerate()
        .par_bridge()
        .for_each_with(sender, |tx, (idx, line)| {
            let line_no = idx + 1;
            let result = match line {
                Ok(text) if text.trim().is_empty() => return,
                Ok(text) => serde_json::from_str::<Article>(&text).map_err(|e| {
                    // A data error means the JSON was well-formed but is not
                    // a valid article record (missing field, bad date).
                    match e.classify() {
                        serde_json::error::Category::Data => {
                            RecordError::invalid(line_no, e.to_string())
                        }
                        _ => RecordError::malformed_json(line_no, &e),
                    }
                }),
                Err(e) => Err(RecordError::invalid(line_no, format!("unreadable line: {e}"))),
            };
            // A send failure means the writer is gone; its error surfaces
            // at join below.
            let _ = tx.send(ParsedLine {
                line: line_no,
                result,
            });
        });

    let outcome = match writer.join() {
        Ok(result) => result?,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            return Err(Error::Internal(format!(
                "article writer thread panicked: {msg}"
            )));
        }
    };

    // Channel arrival order is nondeterministic; report errors in file order.
    let mut errors = outcome.errors;
    errors.sort_by_key(|e| e.line);

    let stats = IngestStats {
        articles_loaded: outcome.loaded,
        batches_committed: outcome.batches,
        duration: start.elapsed(),
        errors,
    };
    tracing::info!(
        loaded = stats.articles_loaded,
        batches = stats.batches_committed,
        errors = stats.errors.len(),
        elapsed = ?stats.duration,
        "article load complete"
    );
    Ok(stats)
}

fn write_worker(
    db_path: &Path,
    receiver: &mpsc::Receiver<ParsedLine>,
    batch_size: usize,
) -> Result<WriteOutcome> {
    let store = Store::open(db_path)?;
    let mut outcome = WriteOutcome {
        loaded: 0,
        batches: 0,
        errors: Vec::new(),
    };
    let mut batch: Vec<(usize, Article)> = Vec::with_capacity(batch_size);

    for parsed in receiver {
        match parsed.result {
            Ok(article) => batch.push((parsed.line, article)),
            Err(record_error) => outcome.errors.push(record_error),
        }
        if batch.len() >= batch_size {
            flush_batch(&store, &mut batch, &mut outcome)?;
        }
    }
    flush_batch(&store, &mut batch, &mut outcome)?;

    Ok(outcome)
}

fn flush_batch(
    store: &Store,
    batch: &mut Vec<(usize, Article)>,
    outcome: &mut WriteOutcome,
) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }
    let mut conn = store.connection()?;
    let mut tx = conn.transaction()?;

    for (line, article) in batch.drain(..) {
        if article_exists_in(&tx, article.pmid)? {
            outcome.errors.push(RecordError::duplicate(line, article.pmid.as_i64()));
            continue;
        }
        // A savepoint confines a failed record to itself; the batch
        // transaction keeps the successful ones.
        let savepoint = tx.savepoint()?;
        match insert_article_in(&savepoint, &article) {
            Ok(_) => {
                savepoint.commit()?;
                outcome.loaded += 1;
            }
            Err(Error::Database(db_err)) => {
                tracing::warn!(line, pmid = article.pmid.as_i64(), error = %db_err, "article rejected");
                outcome.errors.push(RecordError::database(line, &db_err));
            }
            Err(other) => return Err(other),
        }
    }

    tx.commit()?;
    outcome.batches += 1;
    tracing::debug!(batches = outcome.batches, loaded = outcome.loaded, "batch committed");
    Ok(())
}
