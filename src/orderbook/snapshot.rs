//! Point-in-time aggregate view of an order book, for market data display.

use serde::{Deserialize, Serialize};

/// One price level as reported in an [`OrderBookSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// The level's price.
    pub price: u64,
    /// Sum of resting orders' remaining quantities at this price.
    pub aggregate_quantity: u64,
    /// Number of resting orders at this price.
    pub order_count: usize,
}

/// A point-in-time copy of an order book's price levels.
///
/// Bids are reported best-first (descending); asks best-first
/// (ascending). Nothing here references the live book — mutating the
/// book after a snapshot is taken never changes the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// The instrument this snapshot is for.
    pub symbol: String,
    /// Logical timestamp when the snapshot was taken.
    pub timestamp: u64,
    /// Bid levels, best (highest price) first.
    pub bids: Vec<LevelInfo>,
    /// Ask levels, best (lowest price) first.
    pub asks: Vec<LevelInfo>,
}

impl OrderBookSnapshot {
    /// The best (highest) bid price, if any resting bids exist.
    #[must_use]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.first().map(|level| level.price)
    }

    /// The best (lowest) ask price, if any resting asks exist.
    #[must_use]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.first().map(|level| level.price)
    }

    /// `best_ask - best_bid`, or `None` if either side is empty.
    #[must_use]
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }
}
