//! Matching Engine Service
//!
//! Single-instrument order matching under price-time priority. Orders rest
//! in a price-sorted book of FIFO queues; each placement works the crossing
//! top of book and reports the trades it produced.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced
//! - Execution price is the best ask's price
//! - An order id rests in at most one queue, and only while not completed
//! - Empty price levels never survive a placement

pub mod book;
pub mod config;
pub mod engine;
pub mod matching;
pub mod registry;
pub mod snapshot;

pub use config::{EngineConfig, MatchPolicy};
pub use engine::{EngineError, MatchingEngine};
pub use snapshot::BookSnapshot;
