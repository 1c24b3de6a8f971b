//! Ask (sell-side) order book
//!
//! Maintains sell order ids sorted by price ascending (best ask first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Side;

use super::price_level::{PriceLevel, PriceLevelQueue};
use super::{BookError, LevelSummary};

/// Ask (sell) side order book
///
/// The lowest ask is best. At each price level, ids are kept in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    /// Price levels sorted ascending (lowest price first)
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Enqueue an order id at its price, creating the level if needed
    ///
    /// Returns true if a new level was created
    pub fn insert(&mut self, order_id: OrderId, price: Price) -> bool {
        let created = !self.levels.contains_key(&price);
        self.levels
            .entry(price)
            .or_insert_with(PriceLevel::new)
            .enqueue(order_id);
        created
    }

    /// Get the best ask price (lowest)
    pub fn best_ask_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub(crate) fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Delete an empty price level
    pub fn remove_level(&mut self, price: Price) -> Result<(), BookError> {
        match self.levels.get(&price) {
            None => Err(BookError::LevelNotFound {
                side: Side::Sell,
                price,
            }),
            Some(level) if !level.is_empty() => Err(BookError::LevelNotEmpty {
                side: Side::Sell,
                price,
                resting: level.len(),
            }),
            Some(_) => {
                self.levels.remove(&price);
                Ok(())
            }
        }
    }

    /// Level summaries, lowest price first
    pub fn levels(&self) -> Vec<LevelSummary> {
        self.levels
            .iter()
            .map(|(price, level)| LevelSummary {
                price: *price,
                order_count: level.len(),
            })
            .collect()
    }

    /// Times this id appears across all levels
    pub fn occurrences(&self, order_id: &OrderId) -> usize {
        self.levels
            .values()
            .map(|level| level.iter().filter(|id| *id == order_id).count())
            .sum()
    }

    /// Check if the ask book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevelQueue::len).sum()
    }
}
