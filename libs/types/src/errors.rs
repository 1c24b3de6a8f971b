//! Error types for order construction and fills

use thiserror::Error;

use crate::ids::OrderId;

/// Order-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    /// Non-positive amount or price supplied at creation
    #[error("Invalid argument: {field} must be greater than zero, got {value}")]
    InvalidArgument { field: &'static str, value: String },

    /// A fill would push the executed amount above the requested amount
    #[error("Fill of {fill} would exceed order {order_id}: executed {executed} of {requested}")]
    Overfill {
        order_id: OrderId,
        requested: String,
        executed: String,
        fill: String,
    },

    /// Execution state does not describe a placeable order
    #[error("Order {order_id} is not placeable: status {status}, executed {executed} of {requested}")]
    InconsistentState {
        order_id: OrderId,
        status: String,
        executed: String,
        requested: String,
    },
}
