//! Crossing detection logic
//!
//! Determines when the top of book can trade

use types::numeric::Price;

/// Check if a bid and ask can match at given prices
///
/// A bid crosses an ask when its price is at or above the ask.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Best bid and ask if both sides have liquidity and they cross
pub fn crossing_pair(best_bid: Option<Price>, best_ask: Option<Price>) -> Option<(Price, Price)> {
    match (best_bid, best_ask) {
        (Some(bid), Some(ask)) if can_match(bid, ask) => Some((bid, ask)),
        _ => None,
    }
}
