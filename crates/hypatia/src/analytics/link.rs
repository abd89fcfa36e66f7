//! Minimum citation-hop distance between two authors.
//!
//! A multi-source breadth-first search over the citation graph. Every
//! article authored by A seeds the frontier at depth 0; edges are followed
//! in the citing → cited direction only; the first dequeued article
//! authored by B yields the answer. BFS dequeues nodes in nondecreasing
//! depth order, so that first hit is the minimum.
//!
//! The adjacency is materialized with one bulk query before traversal
//! starts. The search itself runs against local state and holds no store
//! locks, so any number of link queries may run concurrently.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::Result;
use crate::store::Store;
use crate::types::AuthorKey;

/// Minimum number of citation hops from an article by `author_a` to an
/// article by `author_b`, or `None` when no such path exists.
///
/// Two authors sharing an article are 0 hops apart. Either author having
/// no articles at all means no path.
pub(crate) fn min_links_between(
    store: &Store,
    author_a: &AuthorKey,
    author_b: &AuthorKey,
) -> Result<Option<usize>> {
    let seeds = store.articles_by_author(author_a)?;
    if seeds.is_empty() {
        return Ok(None);
    }
    let targets: HashSet<i64> = store.articles_by_author(author_b)?.into_iter().collect();
    if targets.is_empty() {
        return Ok(None);
    }
    let adjacency = store.citing_adjacency()?;
    Ok(shortest_depth(&seeds, &targets, &adjacency))
}

/// BFS from all seeds at once; each node is enqueued at most once, giving
/// O(V+E) over the reachable component.
fn shortest_depth(
    seeds: &[i64],
    targets: &HashSet<i64>,
    adjacency: &HashMap<i64, Vec<i64>>,
) -> Option<usize> {
    let mut visited: HashSet<i64> = seeds.iter().copied().collect();
    let mut frontier: VecDeque<(i64, usize)> = seeds.iter().map(|&pmid| (pmid, 0)).collect();

    while let Some((pmid, depth)) = frontier.pop_front() {
        if targets.contains(&pmid) {
            return Some(depth);
        }
        if let Some(cited) = adjacency.get(&pmid) {
            for &next in cited {
                if visited.insert(next) {
                    frontier.push_back((next, depth + 1));
                }
            }
        }
    }
    None
}
