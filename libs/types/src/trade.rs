//! Trade execution record
//!
//! A trade is an immutable value produced once per crossing event and copied
//! into the trade list of both orders it satisfies.

use crate::ids::TradeId;
use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One execution between a bid and an ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// Engine-local monotonic sequence
    pub sequence: u64,
    pub amount: Quantity,
    pub price: Price,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Create a trade stamped with a fresh id and the current time
    pub fn new(sequence: u64, amount: Quantity, price: Price) -> Self {
        Self {
            trade_id: TradeId::new(),
            sequence,
            amount,
            price,
            executed_at: Utc::now(),
        }
    }

    /// Calculate trade value (price × amount)
    pub fn trade_value(&self) -> Decimal {
        self.amount.notional(self.price)
    }
}
