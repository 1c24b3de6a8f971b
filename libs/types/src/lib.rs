//! Types library for the order book
//!
//! Core type definitions shared by the matching engine and its hosts.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, TradeId, CustomerId, Symbol)
//! - `numeric`: Fixed-point decimal types (Price, Quantity)
//! - `order`: Order lifecycle types
//! - `trade`: Trade execution record
//! - `errors`: Order error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::errors::*;
}
