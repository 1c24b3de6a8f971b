//! Order registry
//!
//! Arena of every order the engine has accepted, keyed by id. This is the
//! single source of truth for execution state; the book only holds ids.
//! Entries are never removed.

use std::collections::HashMap;
use types::ids::OrderId;
use types::order::Order;

#[derive(Debug, Clone, Default)]
pub struct OrderRegistry {
    orders: HashMap<OrderId, Order>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
        }
    }

    /// Store an order, returning the previous entry under the same id
    pub fn insert(&mut self, order: Order) -> Option<Order> {
        self.orders.insert(order.id(), order)
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub(crate) fn get_mut(&mut self, order_id: &OrderId) -> Option<&mut Order> {
        self.orders.get_mut(order_id)
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.contains_key(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }
}
