//! CLI command implementations.

pub mod author;
pub mod citations;
pub mod display;
pub mod funding;
pub mod impact;
pub mod journal;
pub mod keyword;
pub mod link;
pub mod load;
pub mod simulate;
pub mod stats;
