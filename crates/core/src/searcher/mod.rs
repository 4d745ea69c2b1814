//! Download search across public indexers.
//!
//! A [`QueryContext`] goes to the [`Aggregator`], which asks every eligible
//! [`Source`] concurrently through a shared [`Transport`], then merges,
//! deduplicates and ranks what comes back.

mod aggregator;
mod dedup;
mod magnet;
mod planner;
pub mod settle;
pub mod sources;
pub mod title_parser;
mod transport;
mod types;

pub use aggregator::Aggregator;
pub use dedup::{deduplicate, rank_candidates};
pub use magnet::{magnet_uri, MagnetBuilder};
pub use planner::{describe, eligible_sources, is_eligible};
pub use settle::{settle_all, Settled};
pub use sources::{create_sources, SourceSettings};
pub use title_parser::{parse_title, ParsedTitle};
pub use transport::{create_transport, DirectTransport, RelayTransport, Transport};
pub use types::*;
