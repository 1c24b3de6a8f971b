//! Matching logic module
//!
//! Implements price-time priority matching over the book index

pub mod crossing;
pub mod executor;

pub use crossing::can_match;
pub use executor::{MatchError, MatchExecutor};
