//! Analytics over the citation graph.
//!
//! Three read-only computations, all served from the store and the
//! citation-count cache:
//!
//! - [`impact`]: a journal's year-scoped citation ratio
//! - [`link`]: minimum citation hops between two authors' article sets
//! - [`ranking`]: an author's articles ranked by citation count
//!
//! None of these hold locks across the computation beyond the individual
//! store queries they issue, so arbitrarily many may run concurrently.

pub(crate) mod impact;
pub(crate) mod link;
pub(crate) mod ranking;
