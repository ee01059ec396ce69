//! Order book error types.

use super::order::OrderId;
use std::fmt;

/// Errors surfaced synchronously by [`crate::OrderBook`] operations.
///
/// Validation failures never mutate book state (spec §7). Invariant
/// violations (I1-I7) are programming errors, not represented here —
/// they are caught by `debug_assert!` and abort the process.
#[derive(Debug)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Bad quantity, bad price, wrong symbol, or an unsupported kind.
    InvalidRequest(String),
    /// An order with this id is already present on the book.
    OrderExists(OrderId),
    /// No order with this id is resting on the book.
    NotFound(OrderId),
    /// The order is already FILLED, CANCELLED, or REJECTED.
    AlreadyTerminal(OrderId),
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            OrderBookError::OrderExists(id) => write!(f, "order already exists: {id}"),
            OrderBookError::NotFound(id) => write!(f, "order not found: {id}"),
            OrderBookError::AlreadyTerminal(id) => {
                write!(f, "order is already in a terminal state: {id}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
