//! Core `OrderBook`: the authoritative per-symbol state.
//!
//! # Locking discipline
//!
//! Every field that changes under submission or cancellation lives in
//! [`BookState`], guarded by a single [`parking_lot::RwLock`]. `submit`
//! and `cancel` take the write guard for their full duration, including
//! trade emission — trades are built up in a local `Vec` and only handed
//! to the caller after the lock is released, so fan-out (broadcast,
//! persistence) never happens while the lock is held. `snapshot` and
//! `get_order` take the read guard. No suspension point (I/O, await,
//! blocking call) ever occurs while either guard is held.

use super::order::{Order, OrderId, Side};
use super::price_level::PriceLevel;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Self-trade handling policy for a book's matching procedure.
///
/// The spec does not mandate self-trade prevention; the default is to
/// allow it. This enum exists so a caller can make the policy explicit
/// even though, today, `Allow` is the only behavior implemented — see
/// `DESIGN.md` for the open question this resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SelfTradePolicy {
    /// Same-owner orders may match each other. Matches the reference
    /// behavior this crate is modeled on.
    #[default]
    Allow,
}

/// All of a book's mutable state, behind one writer lock.
pub(super) struct BookState {
    /// Bid side, keyed by price; best bid is the maximum key.
    pub(super) bids: BTreeMap<u64, PriceLevel>,
    /// Ask side, keyed by price; best ask is the minimum key.
    pub(super) asks: BTreeMap<u64, PriceLevel>,
    /// id -> (side, price) for O(log N) cancel/lookup without scanning
    /// every level.
    pub(super) order_locations: HashMap<OrderId, (Side, u64)>,
}

impl BookState {
    fn new() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_locations: HashMap::new(),
        }
    }

    /// Looks up a resting order's current record by id.
    pub(super) fn get(&self, id: &OrderId) -> Option<&Order> {
        let (side, price) = self.order_locations.get(id)?;
        let level = match side {
            Side::Buy => self.bids.get(price),
            Side::Sell => self.asks.get(price),
        }?;
        level.peek(id)
    }
}

/// A per-instrument container holding the bid and ask price-ordered
/// indices, the id lookup, and the writer lock that serializes every
/// mutation (spec §4.2, §5).
pub struct OrderBook {
    symbol: String,
    pub(super) state: RwLock<BookState>,
    self_trade_policy: SelfTradePolicy,
}

impl OrderBook {
    /// Creates an empty order book for `symbol`.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            state: RwLock::new(BookState::new()),
            self_trade_policy: SelfTradePolicy::default(),
        }
    }

    /// Creates an empty order book with an explicit self-trade policy.
    #[must_use]
    pub fn with_self_trade_policy(symbol: impl Into<String>, policy: SelfTradePolicy) -> Self {
        Self {
            symbol: symbol.into(),
            state: RwLock::new(BookState::new()),
            self_trade_policy: policy,
        }
    }

    /// The instrument this book serves.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The book's configured self-trade policy.
    #[must_use]
    pub fn self_trade_policy(&self) -> SelfTradePolicy {
        self.self_trade_policy
    }

    /// Whether the book currently has no resting orders on either side.
    ///
    /// Used by [`crate::MatchingEngine::remove_symbol`] to enforce
    /// `SymbolBusy` (spec §4.4, §7).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.bids.is_empty() && state.asks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_book_is_empty() {
        let book = OrderBook::new("BTC/USD");
        assert!(book.is_empty());
        assert_eq!(book.symbol(), "BTC/USD");
        assert_eq!(book.self_trade_policy(), SelfTradePolicy::Allow);
    }
}
