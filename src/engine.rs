//! `MatchingEngine`: the registry of per-symbol order books.

use crate::orderbook::{OrderBook, OrderBookError, SelfTradePolicy};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Errors surfaced by [`MatchingEngine`] operations, in addition to
/// whatever an individual [`OrderBook`] returns.
#[derive(Debug)]
#[non_exhaustive]
pub enum EngineError {
    /// No book is registered for this symbol.
    UnknownSymbol(String),
    /// A book for this symbol is already registered.
    SymbolExists(String),
    /// [`MatchingEngine::remove_symbol`] was called on a book that still
    /// has resting orders (spec §4.4, §7).
    SymbolBusy(String),
    /// Passed through from the targeted [`OrderBook`].
    Book(OrderBookError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownSymbol(symbol) => write!(f, "unknown symbol: {symbol}"),
            EngineError::SymbolExists(symbol) => write!(f, "symbol already registered: {symbol}"),
            EngineError::SymbolBusy(symbol) => {
                write!(f, "cannot remove symbol with resting orders: {symbol}")
            }
            EngineError::Book(source) => write!(f, "{source}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Book(source) => Some(source),
            _ => None,
        }
    }
}

impl From<OrderBookError> for EngineError {
    fn from(source: OrderBookError) -> Self {
        EngineError::Book(source)
    }
}

/// A registry mapping symbols to independent [`OrderBook`]s.
///
/// Each book serializes its own mutations behind its own writer lock
/// (spec §5); the registry itself only needs to serialize the brief
/// insert/remove/lookup of a symbol's entry, which [`DashMap`] does
/// without blocking unrelated symbols.
pub struct MatchingEngine {
    books: DashMap<String, Arc<OrderBook>>,
}

impl MatchingEngine {
    /// Creates an engine with no registered symbols.
    #[must_use]
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// Registers a new, empty book for `symbol`.
    ///
    /// # Errors
    /// [`EngineError::SymbolExists`] if a book is already registered.
    pub fn add_symbol(&self, symbol: impl Into<String>) -> Result<(), EngineError> {
        let symbol = symbol.into();
        if self.books.contains_key(&symbol) {
            return Err(EngineError::SymbolExists(symbol));
        }
        info!(%symbol, "symbol registered");
        self.books
            .insert(symbol.clone(), Arc::new(OrderBook::new(symbol)));
        Ok(())
    }

    /// Registers a new, empty book for `symbol` with an explicit
    /// self-trade policy.
    ///
    /// # Errors
    /// [`EngineError::SymbolExists`] if a book is already registered.
    pub fn add_symbol_with_policy(
        &self,
        symbol: impl Into<String>,
        policy: SelfTradePolicy,
    ) -> Result<(), EngineError> {
        let symbol = symbol.into();
        if self.books.contains_key(&symbol) {
            return Err(EngineError::SymbolExists(symbol));
        }
        self.books.insert(
            symbol.clone(),
            Arc::new(OrderBook::with_self_trade_policy(symbol, policy)),
        );
        Ok(())
    }

    /// Unregisters `symbol`, refusing if its book still has resting
    /// orders.
    ///
    /// # Errors
    /// [`EngineError::UnknownSymbol`] if no such book exists;
    /// [`EngineError::SymbolBusy`] if it still holds resting orders.
    pub fn remove_symbol(&self, symbol: &str) -> Result<(), EngineError> {
        let Some(entry) = self.books.get(symbol) else {
            return Err(EngineError::UnknownSymbol(symbol.to_owned()));
        };
        if !entry.is_empty() {
            return Err(EngineError::SymbolBusy(symbol.to_owned()));
        }
        drop(entry);
        self.books.remove(symbol);
        info!(%symbol, "symbol unregistered");
        Ok(())
    }

    /// The currently registered symbols, in no particular order.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.books.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Looks up the book for `symbol`, if registered.
    #[must_use]
    pub fn book(&self, symbol: &str) -> Option<Arc<OrderBook>> {
        self.books.get(symbol).map(|entry| Arc::clone(entry.value()))
    }

    /// Looks up an order by id, trying every registered book.
    ///
    /// The spec leaves the scan order across symbols unspecified; this
    /// implementation iterates the registry's natural (unordered)
    /// iteration order and returns on the first hit.
    ///
    /// # Errors
    /// [`EngineError::Book`] wrapping [`OrderBookError::NotFound`] if no
    /// registered book has a resting order with this id.
    pub fn find_order(&self, order_id: crate::orderbook::OrderId) -> Result<crate::orderbook::Order, EngineError> {
        for entry in self.books.iter() {
            if let Ok(order) = entry.value().get_order(order_id) {
                return Ok(order);
            }
        }
        warn!(%order_id, "order not found in any registered book");
        Err(EngineError::Book(OrderBookError::NotFound(order_id)))
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
