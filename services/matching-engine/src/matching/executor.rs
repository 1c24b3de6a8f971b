//! Trade execution logic
//!
//! Works the crossing top of book FIFO-first, applies each trade to both
//! orders and prunes exhausted orders and levels.

use thiserror::Error;
use tracing::{debug, info};
use types::errors::OrderError;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Side;
use types::trade::Trade;

use crate::book::{BookError, OrderBookIndex, PriceLevelQueue};
use crate::config::MatchPolicy;
use crate::registry::OrderRegistry;

use super::crossing;

/// Match failures
///
/// Every variant means the book and the registry have diverged; the
/// engine that produced it should not be trusted further.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("critical: {side} order {order_id} is in the book but not in the registry")]
    MissingOrder { side: Side, order_id: OrderId },

    #[error("critical: {side} order {order_id} is queued with nothing left to fill")]
    StaleOrder { side: Side, order_id: OrderId },

    #[error("critical: trade sequence exhausted")]
    SequenceExhausted,

    #[error("critical: failed to apply fill: {0}")]
    Fill(#[from] OrderError),

    #[error("critical: book update failed: {0}")]
    Book(#[from] BookError),
}

/// Match executor for handling trade generation
///
/// Hands out every sequence number from the starting value up to and
/// including `u64::MAX`, once each.
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    starting_sequence: u64,
    sequence_counter: u64,
    exhausted: bool,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            starting_sequence,
            sequence_counter: starting_sequence,
            exhausted: false,
        }
    }

    /// Number of sequence numbers handed out so far
    pub fn trades_issued(&self) -> u64 {
        self.sequence_counter - self.starting_sequence + u64::from(self.exhausted)
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> Result<u64, MatchError> {
        if self.exhausted {
            return Err(MatchError::SequenceExhausted);
        }
        let seq = self.sequence_counter;
        match seq.checked_add(1) {
            Some(next) => self.sequence_counter = next,
            None => self.exhausted = true,
        }
        Ok(seq)
    }

    /// Match whatever crosses at the top of the book
    ///
    /// Returns the trades in execution order. With `MatchPolicy::TopOfBook`
    /// only the bid/ask pair crossing on entry is worked.
    pub fn match_orders<B: OrderBookIndex>(
        &mut self,
        book: &mut B,
        registry: &mut OrderRegistry,
        policy: MatchPolicy,
    ) -> Result<Vec<Trade>, MatchError> {
        let mut trades = Vec::new();

        while let Some((bid_price, ask_price)) = crossing::crossing_pair(book.best_bid(), book.best_ask()) {
            let executed = self.match_levels(book, registry, bid_price, ask_price, &mut trades)?;

            if policy == MatchPolicy::TopOfBook || executed == 0 {
                break;
            }
        }

        Ok(trades)
    }

    /// Trade the two given levels against each other until one empties
    fn match_levels<B: OrderBookIndex>(
        &mut self,
        book: &mut B,
        registry: &mut OrderRegistry,
        bid_price: Price,
        ask_price: Price,
        trades: &mut Vec<Trade>,
    ) -> Result<usize, MatchError> {
        let mut executed = 0;

        while let (Some(bid_id), Some(ask_id)) = (
            book.front(Side::Buy, bid_price),
            book.front(Side::Sell, ask_price),
        ) {
            let bid_remaining = registry
                .get(&bid_id)
                .ok_or(MatchError::MissingOrder { side: Side::Buy, order_id: bid_id })?
                .remaining_amount();
            let ask_remaining = registry
                .get(&ask_id)
                .ok_or(MatchError::MissingOrder { side: Side::Sell, order_id: ask_id })?
                .remaining_amount();

            if bid_remaining.is_zero() {
                return Err(MatchError::StaleOrder { side: Side::Buy, order_id: bid_id });
            }
            if ask_remaining.is_zero() {
                return Err(MatchError::StaleOrder { side: Side::Sell, order_id: ask_id });
            }

            // Execution price is always the ask level's price
            let amount = bid_remaining.min(ask_remaining);
            let trade = Trade::new(self.next_sequence()?, amount, ask_price);

            apply_fill(registry, Side::Buy, bid_id, &trade)?;
            apply_fill(registry, Side::Sell, ask_id, &trade)?;

            info!(
                trade_id = %trade.trade_id,
                sequence = trade.sequence,
                %amount,
                price = %ask_price,
                bid_order = %bid_id,
                ask_order = %ask_id,
                "trade executed"
            );

            trades.push(trade);
            executed += 1;

            settle_front(book, registry, Side::Buy, bid_price, bid_id)?;
            settle_front(book, registry, Side::Sell, ask_price, ask_id)?;
        }

        Ok(executed)
    }
}

fn apply_fill(
    registry: &mut OrderRegistry,
    side: Side,
    order_id: OrderId,
    trade: &Trade,
) -> Result<(), MatchError> {
    registry
        .get_mut(&order_id)
        .ok_or(MatchError::MissingOrder { side, order_id })?
        .apply_trade(trade)?;
    Ok(())
}

/// Pop a completed front order and drop its level once empty
fn settle_front<B: OrderBookIndex>(
    book: &mut B,
    registry: &OrderRegistry,
    side: Side,
    price: Price,
    order_id: OrderId,
) -> Result<(), MatchError> {
    let completed = registry
        .get(&order_id)
        .ok_or(MatchError::MissingOrder { side, order_id })?
        .is_completed();

    if completed {
        book.pop_front(side, price);
        debug!(%order_id, %side, %price, "order completed");
    }

    if book.level(side, price).is_some_and(PriceLevelQueue::is_empty) {
        book.remove_level(side, price)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::OrderBook;
    use std::str::FromStr;
    use types::numeric::Quantity;
    use types::order::{Order, OrderStatus};

    fn rest(book: &mut OrderBook, registry: &mut OrderRegistry, side: Side, amount: &str, price: u64) -> OrderId {
        let order = Order::new(
            "customer",
            Quantity::from_str(amount).unwrap(),
            Price::from_u64(price),
            side,
        )
        .unwrap();
        let id = order.id();
        book.add(side, id, order.price(), order.remaining_amount()).unwrap();
        registry.insert(order);
        id
    }

    #[test]
    fn test_partial_fill_at_ask_price() {
        let mut book = OrderBook::new();
        let mut registry = OrderRegistry::new();
        let mut executor = MatchExecutor::new(1000);

        let ask = rest(&mut book, &mut registry, Side::Sell, "3", 9000);
        let bid = rest(&mut book, &mut registry, Side::Buy, "5", 10000);

        let trades = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::TopOfBook)
            .unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].sequence, 1000);
        assert_eq!(trades[0].amount, Quantity::from_u64(3));
        assert_eq!(trades[0].price, Price::from_u64(9000));

        let bid_order = registry.get(&bid).unwrap();
        assert_eq!(bid_order.status(), OrderStatus::Pending);
        assert_eq!(bid_order.remaining_amount(), Quantity::from_u64(2));
        assert_eq!(registry.get(&ask).unwrap().status(), OrderStatus::Completed);

        assert_eq!(book.best_ask(), None);
        assert_eq!(book.front(Side::Buy, Price::from_u64(10000)), Some(bid));
        assert_eq!(executor.trades_issued(), 1);
    }

    #[test]
    fn test_no_cross_no_trade() {
        let mut book = OrderBook::new();
        let mut registry = OrderRegistry::new();
        let mut executor = MatchExecutor::new(1);

        rest(&mut book, &mut registry, Side::Buy, "1", 100);
        rest(&mut book, &mut registry, Side::Sell, "1", 200);

        let trades = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::Sweep)
            .unwrap();
        assert!(trades.is_empty());
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn test_fifo_within_level() {
        let mut book = OrderBook::new();
        let mut registry = OrderRegistry::new();
        let mut executor = MatchExecutor::new(1);

        let first = rest(&mut book, &mut registry, Side::Buy, "2", 100);
        let second = rest(&mut book, &mut registry, Side::Buy, "2", 100);
        rest(&mut book, &mut registry, Side::Sell, "3", 100);

        let trades = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::TopOfBook)
            .unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(registry.get(&first).unwrap().trades()[0], trades[0]);
        assert!(registry.get(&first).unwrap().is_completed());
        assert_eq!(registry.get(&second).unwrap().executed_amount(), Quantity::from_u64(1));
        assert_eq!(book.front(Side::Buy, Price::from_u64(100)), Some(second));
    }

    #[test]
    fn test_top_of_book_stops_at_exhausted_level() {
        let mut book = OrderBook::new();
        let mut registry = OrderRegistry::new();
        let mut executor = MatchExecutor::new(1);

        rest(&mut book, &mut registry, Side::Sell, "1", 100);
        rest(&mut book, &mut registry, Side::Sell, "1", 101);
        rest(&mut book, &mut registry, Side::Buy, "5", 105);

        let trades = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::TopOfBook)
            .unwrap();
        assert_eq!(trades.len(), 1);
        // 105 still crosses 101, left for the next placement
        assert_eq!(book.best_ask(), Some(Price::from_u64(101)));

        let trades = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::Sweep)
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, Price::from_u64(101));
        assert_eq!(book.best_ask(), None);
    }

    #[test]
    fn test_missing_order_is_critical() {
        let mut book = OrderBook::new();
        let mut registry = OrderRegistry::new();
        let mut executor = MatchExecutor::new(1);

        let ghost = OrderId::new();
        book.add_bid(ghost, Price::from_u64(100), Quantity::from_u64(1)).unwrap();
        rest(&mut book, &mut registry, Side::Sell, "1", 100);

        let err = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::TopOfBook)
            .unwrap_err();
        assert_eq!(err, MatchError::MissingOrder { side: Side::Buy, order_id: ghost });
    }

    #[test]
    fn test_stale_completed_order_is_critical() {
        let mut book = OrderBook::new();
        let mut registry = OrderRegistry::new();
        let mut executor = MatchExecutor::new(1);

        let mut done = Order::new("c", Quantity::from_u64(1), Price::from_u64(100), Side::Sell).unwrap();
        done.apply_trade(&Trade::new(0, Quantity::from_u64(1), Price::from_u64(100))).unwrap();
        let done_id = done.id();
        book.add_ask(done_id, Price::from_u64(100), Quantity::from_u64(1)).unwrap();
        registry.insert(done);
        rest(&mut book, &mut registry, Side::Buy, "1", 100);

        let err = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::TopOfBook)
            .unwrap_err();
        assert_eq!(err, MatchError::StaleOrder { side: Side::Sell, order_id: done_id });
    }

    #[test]
    fn test_sequence_exhaustion() {
        let mut book = OrderBook::new();
        let mut registry = OrderRegistry::new();
        let mut executor = MatchExecutor::new(u64::MAX - 1);

        rest(&mut book, &mut registry, Side::Buy, "2", 100);
        rest(&mut book, &mut registry, Side::Sell, "1", 100);
        rest(&mut book, &mut registry, Side::Sell, "1", 100);

        // the last representable sequence is still handed out
        let trades = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::TopOfBook)
            .unwrap();
        let seqs: Vec<_> = trades.iter().map(|t| t.sequence).collect();
        assert_eq!(seqs, vec![u64::MAX - 1, u64::MAX]);
        assert_eq!(executor.trades_issued(), 2);

        let bid = rest(&mut book, &mut registry, Side::Buy, "1", 100);
        rest(&mut book, &mut registry, Side::Sell, "1", 100);

        let err = executor
            .match_orders(&mut book, &mut registry, MatchPolicy::TopOfBook)
            .unwrap_err();
        assert_eq!(err, MatchError::SequenceExhausted);
        // nothing applied
        assert!(registry.get(&bid).unwrap().trades().is_empty());
        assert_eq!(executor.trades_issued(), 2);
    }
}
