//! The `Trade` value record emitted by a match.

use super::order::OrderId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a [`Trade`], generated at execution.
pub type TradeId = Uuid;

/// A single execution between a taker and a resting maker order.
///
/// `price` is always the maker's (resting order's) limit price, not the
/// taker's — the standard convention for matching engines, and the one
/// this crate preserves (spec invariant I7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier, generated at execution.
    pub id: TradeId,
    /// Instrument tag shared by both sides.
    pub symbol: String,
    /// The resting or incoming order on the buy side.
    pub buy_order_id: OrderId,
    /// The resting or incoming order on the sell side.
    pub sell_order_id: OrderId,
    /// Owner of the buy order.
    pub buyer_owner_id: String,
    /// Owner of the sell order.
    pub seller_owner_id: String,
    /// The maker order's limit price.
    pub price: u64,
    /// Strictly positive.
    pub quantity: u64,
    /// Logical timestamp at execution.
    pub executed_at: u64,
}
