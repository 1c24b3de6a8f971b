//! Order book index
//!
//! Two independently sorted sides mapping price → FIFO queue of order ids,
//! plus best-price queries. Only ids are stored here; the engine's registry
//! owns the orders themselves.

pub mod price_level;
pub mod bid_book;
pub mod ask_book;

pub use price_level::{PriceLevel, PriceLevelQueue};
pub use bid_book::BidBook;
pub use ask_book::AskBook;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Side;

/// Index mutation and removal errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    #[error("Invalid amount for order {order_id}: {amount} must be greater than zero")]
    InvalidAmount { order_id: OrderId, amount: String },

    #[error("Price level {side} @ {price} still holds {resting} orders")]
    LevelNotEmpty { side: Side, price: Price, resting: usize },

    #[error("Price level {side} @ {price} does not exist")]
    LevelNotFound { side: Side, price: Price },
}

/// Price and depth of one level, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub price: Price,
    pub order_count: usize,
}

/// Capabilities the matching loop needs from a book index
pub trait OrderBookIndex {
    type Level: PriceLevelQueue;

    /// Enqueue a buy order id at its price
    fn add_bid(&mut self, order_id: OrderId, price: Price, amount: Quantity) -> Result<(), BookError>;

    /// Enqueue a sell order id at its price
    fn add_ask(&mut self, order_id: OrderId, price: Price, amount: Quantity) -> Result<(), BookError>;

    /// Highest bid price; None when the bid side has no liquidity
    fn best_bid(&self) -> Option<Price>;

    /// Lowest ask price; None when the ask side has no liquidity
    fn best_ask(&self) -> Option<Price>;

    fn level(&self, side: Side, price: Price) -> Option<&Self::Level>;

    fn level_mut(&mut self, side: Side, price: Price) -> Option<&mut Self::Level>;

    /// Delete a price level; refuses while any id still rests there
    fn remove_level(&mut self, side: Side, price: Price) -> Result<(), BookError>;

    /// Front id at a level, if the level exists and is non-empty
    fn front(&self, side: Side, price: Price) -> Option<OrderId> {
        self.level(side, price).and_then(PriceLevelQueue::peek)
    }

    /// Pop the front id at a level
    fn pop_front(&mut self, side: Side, price: Price) -> Option<OrderId> {
        self.level_mut(side, price).and_then(PriceLevelQueue::pop)
    }
}

/// Order book for a single instrument
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: BidBook,
    asks: AskBook,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: BidBook::new(),
            asks: AskBook::new(),
        }
    }

    /// Enqueue on the given side
    pub fn add(&mut self, side: Side, order_id: OrderId, price: Price, amount: Quantity) -> Result<(), BookError> {
        match side {
            Side::Buy => self.add_bid(order_id, price, amount),
            Side::Sell => self.add_ask(order_id, price, amount),
        }
    }

    /// Bid levels, highest price first
    pub fn bid_levels(&self) -> Vec<LevelSummary> {
        self.bids.levels()
    }

    /// Ask levels, lowest price first
    pub fn ask_levels(&self) -> Vec<LevelSummary> {
        self.asks.levels()
    }

    pub fn level_count(&self, side: Side) -> usize {
        match side {
            Side::Buy => self.bids.level_count(),
            Side::Sell => self.asks.level_count(),
        }
    }

    /// Total resting ids on both sides
    pub fn order_count(&self) -> usize {
        self.bids.order_count() + self.asks.order_count()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Number of queues (across both sides) holding this id
    pub fn occurrences(&self, order_id: &OrderId) -> usize {
        self.bids.occurrences(order_id) + self.asks.occurrences(order_id)
    }
}

fn check_amount(order_id: OrderId, amount: Quantity) -> Result<(), BookError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(BookError::InvalidAmount {
            order_id,
            amount: amount.to_string(),
        })
    }
}

impl OrderBookIndex for OrderBook {
    type Level = PriceLevel;

    fn add_bid(&mut self, order_id: OrderId, price: Price, amount: Quantity) -> Result<(), BookError> {
        check_amount(order_id, amount)?;
        if self.bids.insert(order_id, price) {
            debug!(%price, "created bid level");
        }
        debug!(%order_id, %price, %amount, "bid enqueued");
        Ok(())
    }

    fn add_ask(&mut self, order_id: OrderId, price: Price, amount: Quantity) -> Result<(), BookError> {
        check_amount(order_id, amount)?;
        if self.asks.insert(order_id, price) {
            debug!(%price, "created ask level");
        }
        debug!(%order_id, %price, %amount, "ask enqueued");
        Ok(())
    }

    fn best_bid(&self) -> Option<Price> {
        self.bids.best_bid_price()
    }

    fn best_ask(&self) -> Option<Price> {
        self.asks.best_ask_price()
    }

    fn level(&self, side: Side, price: Price) -> Option<&PriceLevel> {
        match side {
            Side::Buy => self.bids.level(price),
            Side::Sell => self.asks.level(price),
        }
    }

    fn level_mut(&mut self, side: Side, price: Price) -> Option<&mut PriceLevel> {
        match side {
            Side::Buy => self.bids.level_mut(price),
            Side::Sell => self.asks.level_mut(price),
        }
    }

    fn remove_level(&mut self, side: Side, price: Price) -> Result<(), BookError> {
        match side {
            Side::Buy => self.bids.remove_level(price)?,
            Side::Sell => self.asks.remove_level(price)?,
        }
        debug!(%side, %price, "removed empty level");
        Ok(())
    }
}
