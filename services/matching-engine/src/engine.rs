//! Matching engine core
//!
//! Main coordinator for the book index, the order registry and the matching
//! loop of one instrument. All mutable state sits behind a single lock:
//! a placement holds the write lock from index insertion through matching,
//! so readers see either the state before a placement or after it.

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{error, warn};
use types::errors::OrderError;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::Order;
use types::trade::Trade;

use crate::book::{BookError, LevelSummary, OrderBook, OrderBookIndex};
use crate::config::EngineConfig;
use crate::matching::{MatchError, MatchExecutor};
use crate::registry::OrderRegistry;
use crate::snapshot::BookSnapshot;

/// Engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Order not found: {order_id}")]
    NotFound { order_id: OrderId },

    #[error("Order {order_id} has already been placed")]
    DuplicateOrder { order_id: OrderId },

    #[error("order rejected: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("failed to place order in order book: {0}")]
    OrderBook(#[from] BookError),

    #[error("failed to match orders: {0}")]
    Match(#[from] MatchError),
}

impl EngineError {
    /// True when the book and the registry may have diverged
    pub fn is_critical(&self) -> bool {
        matches!(self, EngineError::Match(_))
    }
}

struct EngineState {
    book: OrderBook,
    registry: OrderRegistry,
    executor: MatchExecutor,
    /// Set once a critical match error has been returned
    suspect: bool,
}

/// Single-instrument matching engine
///
/// Safe to share across threads as `Arc<MatchingEngine>`.
pub struct MatchingEngine {
    config: EngineConfig,
    state: RwLock<EngineState>,
}

impl MatchingEngine {
    /// Create an engine with an empty book and default configuration
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self::with_config(EngineConfig::new(symbol))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let executor = MatchExecutor::new(config.starting_sequence);
        Self {
            config,
            state: RwLock::new(EngineState {
                book: OrderBook::new(),
                registry: OrderRegistry::new(),
                executor,
                suspect: false,
            }),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.config.symbol
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Place an order and match the book
    ///
    /// Returns the trades this placement produced, in execution order. An
    /// order that fails validation or that the book rejects is not stored,
    /// and no matching runs.
    pub fn place_order(&self, order: Order) -> Result<Vec<Trade>, EngineError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let order_id = order.id();

        if state.registry.contains(&order_id) {
            warn!(%order_id, symbol = %self.config.symbol, "duplicate order rejected");
            return Err(EngineError::DuplicateOrder { order_id });
        }

        if let Err(err) = order.validate() {
            warn!(%order_id, symbol = %self.config.symbol, error = %err, "invalid order rejected");
            return Err(err.into());
        }

        if let Err(err) = state
            .book
            .add(order.side(), order_id, order.price(), order.remaining_amount())
        {
            warn!(%order_id, symbol = %self.config.symbol, error = %err, "order rejected by book");
            return Err(err.into());
        }

        state.registry.insert(order);

        state
            .executor
            .match_orders(&mut state.book, &mut state.registry, self.config.match_policy)
            .map_err(|err| {
                state.suspect = true;
                error!(%order_id, symbol = %self.config.symbol, error = %err, "matching failed");
                EngineError::Match(err)
            })
    }

    /// Snapshot of an order's current state
    pub fn get_order(&self, order_id: &OrderId) -> Result<Order, EngineError> {
        self.state
            .read()
            .registry
            .get(order_id)
            .cloned()
            .ok_or(EngineError::NotFound { order_id: *order_id })
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.state.read().book.best_bid()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.state.read().book.best_ask()
    }

    /// Bid levels, highest price first
    pub fn bid_levels(&self) -> Vec<LevelSummary> {
        self.state.read().book.bid_levels()
    }

    /// Ask levels, lowest price first
    pub fn ask_levels(&self) -> Vec<LevelSummary> {
        self.state.read().book.ask_levels()
    }

    /// Consistent view of both sides
    pub fn snapshot(&self) -> BookSnapshot {
        let state = self.state.read();
        BookSnapshot {
            symbol: self.config.symbol.clone(),
            best_bid: state.book.best_bid(),
            best_ask: state.book.best_ask(),
            bids: state.book.bid_levels(),
            asks: state.book.ask_levels(),
        }
    }

    /// Orders ever accepted
    pub fn order_count(&self) -> usize {
        self.state.read().registry.len()
    }

    /// Order ids currently resting in the book
    pub fn resting_count(&self) -> usize {
        self.state.read().book.order_count()
    }

    /// Number of queues holding this id (0 or 1 in a healthy book)
    pub fn queue_occurrences(&self, order_id: &OrderId) -> usize {
        self.state.read().book.occurrences(order_id)
    }

    /// Trades executed since construction
    pub fn trade_count(&self) -> u64 {
        self.state.read().executor.trades_issued()
    }

    /// All accepted orders, in no particular order
    pub fn orders(&self) -> Vec<Order> {
        self.state.read().registry.iter().cloned().collect()
    }

    /// Whether a critical match failure has been returned by this engine
    pub fn is_suspect(&self) -> bool {
        self.state.read().suspect
    }
}
