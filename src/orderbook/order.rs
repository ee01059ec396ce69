//! The `Order` value record and its supporting enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque unique identifier assigned to an order at admission.
pub type OrderId = Uuid;

/// BUY or SELL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A resting BUY order (bid) or an incoming order that buys.
    Buy,
    /// A resting SELL order (ask) or an incoming order that sells.
    Sell,
}

impl Side {
    /// The opposite side: the side a matching counterparty rests on.
    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// LIMIT, MARKET, or STOP.
///
/// `Stop` is accepted into the record but treated as `Limit` by the
/// matching core — full stop-trigger semantics (arming against last
/// trade price) are out of scope for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// Rests at `limit_price` if not immediately (fully) matched.
    Limit,
    /// Matches against any available opposite liquidity; any residual
    /// quantity is rejected rather than resting.
    Market,
    /// Accepted into the order record and matched exactly like `Limit`.
    /// No trigger mechanism against last trade price is implemented.
    Stop,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Stop => write!(f, "STOP"),
        }
    }
}

/// Lifecycle status of an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Admitted, no fills yet.
    New,
    /// At least one fill occurred; quantity remains.
    Partial,
    /// Fully filled; no longer resting.
    Filled,
    /// Cancelled by the owner (or on their behalf); no longer resting.
    Cancelled,
    /// A `MARKET` order with residual quantity after matching; the
    /// executions that did occur are still observable on the returned
    /// trade list. Never inserted into the book.
    Rejected,
}

/// An order submitted to, or resting on, an [`crate::OrderBook`].
///
/// `filled_quantity` is monotonically non-decreasing; `remaining_quantity`
/// is always `original_quantity - filled_quantity` and is never persisted
/// directly — it is derived so the invariant can't drift out of sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque unique identifier, assigned at admission.
    pub id: OrderId,
    /// Opaque identifier of the submitter.
    pub owner_id: String,
    /// Instrument tag.
    pub symbol: String,
    /// BUY or SELL.
    pub side: Side,
    /// LIMIT, MARKET, or STOP.
    pub kind: OrderKind,
    /// Required for `Limit`/`Stop`; ignored for `Market`.
    pub limit_price: Option<u64>,
    /// Strictly positive at admission.
    pub original_quantity: u64,
    /// Non-negative, monotonically non-decreasing.
    pub filled_quantity: u64,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Logical timestamp assigned by the engine at admission.
    pub created_at: u64,
    /// Logical timestamp updated on every mutation.
    pub updated_at: u64,
}

impl Order {
    /// `original_quantity - filled_quantity`. Never negative by
    /// construction: `filled_quantity` only ever advances up to
    /// `original_quantity` via [`Order::apply_fill`].
    #[must_use]
    pub fn remaining_quantity(&self) -> u64 {
        self.original_quantity - self.filled_quantity
    }

    /// Records a fill of `quantity` and stamps `now` as the update time,
    /// transitioning `status` to `Filled` or `Partial` accordingly.
    ///
    /// # Panics
    /// In debug builds, panics if `quantity` is zero or exceeds the
    /// order's remaining quantity — both are programming errors in the
    /// matching core (spec invariant I5), never caller input.
    pub(crate) fn apply_fill(&mut self, quantity: u64, now: u64) {
        debug_assert!(quantity > 0, "a fill must move a positive quantity");
        debug_assert!(
            quantity <= self.remaining_quantity(),
            "a fill can never exceed the order's remaining quantity"
        );
        self.filled_quantity += quantity;
        self.updated_at = now;
        self.status = if self.remaining_quantity() == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
    }
}
