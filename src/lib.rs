//! # matching-core
//!
//! A real-time, price-time priority limit order matching engine core.
//!
//! This crate implements the hardest part of an exchange: the in-memory
//! price-level index, the price-time priority matching algorithm, the
//! order lifecycle state machine, and the concurrency discipline that
//! keeps one instrument's order book internally consistent under
//! concurrent submissions.
//!
//! ## Scope
//!
//! In scope: [`OrderBook`](orderbook::OrderBook), [`MatchingEngine`], the
//! [`Order`](orderbook::Order)/[`Trade`](orderbook::Trade) value records,
//! and the [`PriceLevel`](orderbook::PriceLevel) FIFO queue.
//!
//! Out of scope (external collaborators): transport (HTTP/WebSocket),
//! authentication and rate limiting, persistent storage and snapshot
//! caching, market data analytics (VWAP/OHLCV/Volume Profile), pre-trade
//! risk checks, and notification delivery. These layer on top of the
//! types exposed here; none of their concerns leak into this crate.
//!
//! ## Concurrency model
//!
//! Each [`OrderBook`](orderbook::OrderBook) is an independent critical
//! section guarded by a single writer lock; submissions against different
//! symbols proceed in parallel with no shared writers.
//!
//! ## Non-goals
//!
//! Cross-instrument risk; stop/iceberg/OCO order variants beyond the
//! basic three order kinds (`LIMIT`, `MARKET`, `STOP`); multi-process
//! replication or HA; fractional-tick rounding policy; historical replay.
//! `STOP` orders are accepted into [`Order`](orderbook::Order) but are
//! matched as `LIMIT` orders — no trigger mechanism is implemented.

mod engine;
pub mod orderbook;
mod utils;

pub use engine::{EngineError, MatchingEngine};
pub use orderbook::{
    LevelInfo, NewOrder, Order, OrderBook, OrderBookError, OrderBookSnapshot, OrderId, OrderKind,
    OrderStatus, PriceLevel, RestingInfo, SelfTradePolicy, Side, SubmitReport, Trade, TradeId,
};
pub use utils::now_millis;
