//! Bid (buy-side) order book
//!
//! Maintains buy order ids sorted by price descending (best bid first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Side;

use super::price_level::{PriceLevel, PriceLevelQueue};
use super::{BookError, LevelSummary};

/// Bid (buy) side order book
///
/// The highest bid is best. At each price level, ids are kept in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    /// Price levels, ascending in the map; best bid is the last key
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    /// Create a new empty bid book
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

    /// Get the best bid price (highest)
    pub fn best_bid_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
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
                side: Side::Buy,
                price,
            }),
            Some(level) if !level.is_empty() => Err(BookError::LevelNotEmpty {
                side: Side::Buy,
                price,
                resting: level.len(),
            }),
            Some(_) => {
                self.levels.remove(&price);
                Ok(())
            }
        }
    }

    /// Level summaries, highest price first
    pub fn levels(&self) -> Vec<LevelSummary> {
        self.levels
            .iter()
            .rev()
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

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Total resting order ids across all levels
    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevelQueue::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_book_insert() {
        let mut book = BidBook::new();

        assert!(book.insert(OrderId::new(), Price::from_u64(50000)));
        assert!(!book.insert(OrderId::new(), Price::from_u64(50000)));

        assert_eq!(book.level_count(), 1);
        assert_eq!(book.order_count(), 2);
        assert!(!book.is_empty());
    }

    #[test]
    fn test_bid_book_best_bid() {
        let mut book = BidBook::new();
        assert_eq!(book.best_bid_price(), None);

        book.insert(OrderId::new(), Price::from_u64(50000));
        book.insert(OrderId::new(), Price::from_u64(51000)); // Higher price
        book.insert(OrderId::new(), Price::from_u64(49000));

        assert_eq!(book.best_bid_price(), Some(Price::from_u64(51000)));
    }

    #[test]
    fn test_bid_book_levels_descending() {
        let mut book = BidBook::new();

        book.insert(OrderId::new(), Price::from_u64(50000));
        book.insert(OrderId::new(), Price::from_u64(51000));
        book.insert(OrderId::new(), Price::from_u64(49000));
        book.insert(OrderId::new(), Price::from_u64(51000));

        let levels = book.levels();
        let prices: Vec<_> = levels.iter().map(|l| l.price).collect();
        assert_eq!(
            prices,
            vec![Price::from_u64(51000), Price::from_u64(50000), Price::from_u64(49000)]
        );
        assert_eq!(levels[0].order_count, 2);
    }

    #[test]
    fn test_bid_book_remove_level_guards() {
        let mut book = BidBook::new();
        let price = Price::from_u64(50000);

        assert_eq!(
            book.remove_level(price),
            Err(BookError::LevelNotFound { side: Side::Buy, price })
        );

        book.insert(OrderId::new(), price);
        assert_eq!(
            book.remove_level(price),
            Err(BookError::LevelNotEmpty { side: Side::Buy, price, resting: 1 })
        );

        book.level_mut(price).unwrap().pop();
        assert_eq!(book.remove_level(price), Ok(()));
        assert!(book.is_empty());
    }
}
