//! Link graph and ranking
//!
//! [`LinkGraph`] assigns every canonical URL a dense [`NodeId`] and keeps the
//! per-node arrays the ranking pass reads: inbound links, out-degree and a
//! dangling flag. [`PageRank`] runs over a finished graph.

mod rank;
mod store;

pub use rank::{top_n, PageRank, RankOutcome};
pub use store::{Discovery, LinkGraph, SharedGraph, MIN_CAPACITY};

/// Dense, zero-based node index assigned in discovery order
pub type NodeId = usize;
