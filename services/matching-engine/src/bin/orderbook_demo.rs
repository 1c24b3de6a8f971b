//! Walks a BTC-USD book through one resting bid and one crossing ask,
//! printing the book and both orders along the way.

use matching_engine::MatchingEngine;
use tracing_subscriber::EnvFilter;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let engine = MatchingEngine::new("BTC-USD");
    tracing::info!(symbol = %engine.symbol(), "engine started");

    let buy = Order::new("customer1", Quantity::from_u64(1001), Price::from_u64(10000), Side::Buy)?;
    let buy_id = buy.id();
    engine.place_order(buy)?;
    println!("{}", engine.snapshot());
    print_order(&engine.get_order(&buy_id)?);

    let sell = Order::new("customer2", Quantity::from_u64(500), Price::from_u64(9000), Side::Sell)?;
    let sell_id = sell.id();
    let trades = engine.place_order(sell)?;
    tracing::info!(trades = trades.len(), "sell order placed");
    println!("{}", engine.snapshot());

    print_order(&engine.get_order(&sell_id)?);
    print_order(&engine.get_order(&buy_id)?);

    Ok(())
}

fn print_order(order: &Order) {
    println!("-- Order Details --");
    println!("Order ID: {}", order.id());
    println!("Customer ID: {}", order.customer_id());
    println!("Side: {}", order.side());
    println!("Amount: {}", order.amount());
    println!("Price: {}", order.price());
    println!("Status: {}", order.status());
    println!("Created At: {}", order.created_at());
    println!("Executed Amount: {}", order.executed_amount());
    match order.executed_price() {
        Some(price) => println!("Executed Price: {price}"),
        None => println!("Executed Price: -"),
    }
    println!("Total: {}", order.total());
    println!("-------------------");
}
