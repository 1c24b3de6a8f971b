//! Concurrency test
//!
//! Many threads place orders against one shared engine while readers poll
//! it. Placements are serialized, so quantity is conserved and the book
//! never shows a completed order.

use matching_engine::MatchingEngine;
use std::sync::Arc;
use std::thread;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

const THREADS: usize = 8;
const ORDERS_PER_THREAD: usize = 250;

#[test]
fn test_concurrent_placements_conserve_quantity() {
    let engine = Arc::new(MatchingEngine::new("BTC-USD"));

    let writers: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let side = if t % 2 == 0 { Side::Buy } else { Side::Sell };
                let mut ids = Vec::with_capacity(ORDERS_PER_THREAD);
                for _ in 0..ORDERS_PER_THREAD {
                    let order = Order::new(
                        format!("customer-{t}"),
                        Quantity::from_u64(1),
                        Price::from_u64(50000),
                        side,
                    )
                    .unwrap();
                    ids.push(order.id());
                    engine.place_order(order).unwrap();
                }
                ids
            })
        })
        .collect();

    let reader = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..200 {
                let snap = engine.snapshot();
                // a same-price book can never be observed mid-match
                assert!(snap.bids.is_empty() || snap.asks.is_empty());
            }
        })
    };

    let ids: Vec<_> = writers.into_iter().flat_map(|h| h.join().unwrap()).collect();
    reader.join().unwrap();

    // equal buy and sell volume at one price fully clears
    assert_eq!(engine.order_count(), THREADS * ORDERS_PER_THREAD);
    assert_eq!(engine.trade_count(), (THREADS * ORDERS_PER_THREAD / 2) as u64);
    assert_eq!(engine.resting_count(), 0);

    for id in ids {
        let order = engine.get_order(&id).unwrap();
        assert!(order.is_completed());
        assert!(order.check_invariant());
        assert_eq!(engine.queue_occurrences(&id), 0);
    }
}

#[test]
fn test_independent_engines_are_deterministic() {
    let run = || {
        thread::spawn(|| {
            let engine = MatchingEngine::new("ETH-USD");
            for i in 0..100u64 {
                let sell = Order::new("s", Quantity::from_u64(2), Price::from_u64(3000 + i % 5), Side::Sell).unwrap();
                let buy = Order::new("b", Quantity::from_u64(1), Price::from_u64(3002), Side::Buy).unwrap();
                engine.place_order(sell).unwrap();
                engine.place_order(buy).unwrap();
            }
            let snap = engine.snapshot();
            (engine.trade_count(), snap.bids, snap.asks)
        })
    };

    let (h1, h2) = (run(), run());
    let r1 = h1.join().unwrap();
    let r2 = h2.join().unwrap();

    assert_eq!(r1, r2, "Parallel runs must produce identical results");
}
