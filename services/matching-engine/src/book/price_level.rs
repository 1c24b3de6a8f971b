//! Price level implementation with FIFO queue
//!
//! A price level contains the ids of all orders resting at one price.
//! Arrival order is preserved so that the front of the queue always has
//! time priority. Only ids are stored; execution state lives in the registry.

use std::collections::VecDeque;
use types::ids::OrderId;

/// Queue behaviour required of a price level
pub trait PriceLevelQueue {
    /// Add an order id at the back of the queue
    fn enqueue(&mut self, order_id: OrderId);

    /// Front order id without removing it
    fn peek(&self) -> Option<OrderId>;

    /// Remove and return the front order id
    fn pop(&mut self) -> Option<OrderId>;

    fn is_empty(&self) -> bool;

    /// Number of resting orders
    fn len(&self) -> usize;

    fn contains(&self, order_id: &OrderId) -> bool;
}

/// A price level holding order ids in arrival order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceLevel {
    orders: VecDeque<OrderId>,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    /// Iterate ids front to back
    pub fn iter(&self) -> impl Iterator<Item = &OrderId> {
        self.orders.iter()
    }
}

impl PriceLevelQueue for PriceLevel {
    fn enqueue(&mut self, order_id: OrderId) {
        self.orders.push_back(order_id);
    }

    fn peek(&self) -> Option<OrderId> {
        self.orders.front().copied()
    }

    fn pop(&mut self) -> Option<OrderId> {
        self.orders.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn len(&self) -> usize {
        self.orders.len()
    }

    fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.contains(order_id)
    }
}
