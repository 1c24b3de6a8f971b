//! Order lifecycle types
//!
//! An order is created Pending and only ever changes through
//! [`Order::apply_trade`]. It becomes Completed, a terminal state, once the
//! executed amount reaches the requested amount.

use crate::errors::OrderError;
use crate::ids::{CustomerId, OrderId};
use crate::numeric::{Price, Quantity};
use crate::trade::Trade;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Execution status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Accepted, not yet fully executed
    Pending,
    /// Executed amount equals requested amount (terminal)
    Completed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A limit order and its accumulated execution state
///
/// Fields are private so that the execution state can only move forward
/// through `apply_trade`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    side: Side,
    amount: Quantity,
    price: Price,
    status: OrderStatus,
    executed_amount: Quantity,
    executed_price: Option<Price>,
    total: Decimal,
    created_at: DateTime<Utc>,
    trades: Vec<Trade>,
}

impl Order {
    /// Create a new pending order
    ///
    /// Amount and price must both be strictly positive.
    pub fn new(
        customer_id: impl Into<CustomerId>,
        amount: Quantity,
        price: Price,
        side: Side,
    ) -> Result<Self, OrderError> {
        if !amount.is_positive() {
            return Err(OrderError::InvalidArgument {
                field: "amount",
                value: amount.to_string(),
            });
        }
        if !price.is_positive() {
            return Err(OrderError::InvalidArgument {
                field: "price",
                value: price.to_string(),
            });
        }

        Ok(Self {
            id: OrderId::new(),
            customer_id: customer_id.into(),
            side,
            amount,
            price,
            status: OrderStatus::Pending,
            executed_amount: Quantity::zero(),
            executed_price: None,
            total: Decimal::ZERO,
            created_at: Utc::now(),
            trades: Vec::new(),
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Requested amount
    pub fn amount(&self) -> Quantity {
        self.amount
    }

    /// Limit price
    pub fn price(&self) -> Price {
        self.price
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn executed_amount(&self) -> Quantity {
        self.executed_amount
    }

    /// Price of the most recent fill
    pub fn executed_price(&self) -> Option<Price> {
        self.executed_price
    }

    /// Executed amount × last executed price
    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Trades in execution order
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn remaining_amount(&self) -> Quantity {
        self.amount.saturating_sub(self.executed_amount)
    }

    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Check the execution invariant: executed ≤ requested, and Completed
    /// exactly when executed == requested
    pub fn check_invariant(&self) -> bool {
        self.executed_amount <= self.amount
            && (self.status == OrderStatus::Completed) == (self.executed_amount == self.amount)
    }

    /// Check that this order may enter a book
    ///
    /// Repeats the creation checks for orders that did not come through
    /// [`Order::new`], and requires a consistent pending execution state.
    pub fn validate(&self) -> Result<(), OrderError> {
        if !self.amount.is_positive() {
            return Err(OrderError::InvalidArgument {
                field: "amount",
                value: self.amount.to_string(),
            });
        }
        if !self.price.is_positive() {
            return Err(OrderError::InvalidArgument {
                field: "price",
                value: self.price.to_string(),
            });
        }
        if !self.is_pending() || !self.check_invariant() {
            return Err(OrderError::InconsistentState {
                order_id: self.id,
                status: self.status.to_string(),
                executed: self.executed_amount.to_string(),
                requested: self.amount.to_string(),
            });
        }
        Ok(())
    }

    /// Record a fill against this order
    ///
    /// Not idempotent: applying the same trade twice double-counts it. The
    /// total is recomputed from the last fill price rather than accumulated.
    pub fn apply_trade(&mut self, trade: &Trade) -> Result<(), OrderError> {
        let executed = self.executed_amount + trade.amount;
        if executed > self.amount {
            return Err(OrderError::Overfill {
                order_id: self.id,
                requested: self.amount.to_string(),
                executed: self.executed_amount.to_string(),
                fill: trade.amount.to_string(),
            });
        }

        self.trades.push(*trade);
        self.executed_amount = executed;
        self.executed_price = Some(trade.price);
        self.total = executed.notional(trade.price);
        if self.executed_amount == self.amount {
            self.status = OrderStatus::Completed;
        }

        Ok(())
    }
}
