//! Point-in-time view of the book for reporting

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use types::ids::Symbol;
use types::numeric::Price;

use crate::book::LevelSummary;

/// Order book snapshot for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    /// Highest price first
    pub bids: Vec<LevelSummary>,
    /// Lowest price first
    pub asks: Vec<LevelSummary>,
}

impl BookSnapshot {
    /// Best ask minus best bid; negative while the book is crossed
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some(ask.as_decimal() - bid.as_decimal()),
            _ => None,
        }
    }

    pub fn is_crossed(&self) -> bool {
        self.spread().is_some_and(|s| s <= Decimal::ZERO)
    }
}

impl fmt::Display for BookSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-----------------------------")?;
        writeln!(f, "Order Book for symbol: {}", self.symbol)?;
        writeln!(f, "Bids:")?;
        for level in &self.bids {
            writeln!(f, "Price: {}, Orders: {}", level.price, level.order_count)?;
        }
        writeln!(f, "++++")?;
        writeln!(f, "Asks:")?;
        for level in &self.asks {
            writeln!(f, "Price: {}, Orders: {}", level.price, level.order_count)?;
        }
        write!(f, "-----------------------------")
    }
}
