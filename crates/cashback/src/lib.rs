//! Cash-back reward engine.
//!
//! Computes the reward each transaction earned on the card it was charged to,
//! totals it across a feed, and measures how much more the same spending would
//! have earned had every purchase gone to the best registered program.

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod rewards;
pub mod telemetry;
pub mod transactions;
