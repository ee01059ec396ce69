//! Public operations on an [`OrderBook`]: submit, cancel, snapshot, lookup.

use super::book::OrderBook;
use super::error::OrderBookError;
use super::matching::match_order;
use super::order::{Order, OrderId, OrderKind, OrderStatus, Side};
use super::price_level::PriceLevel;
use super::snapshot::{LevelInfo, OrderBookSnapshot};
use super::trade::Trade;
use crate::utils::now_millis;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Everything the caller needs to know about the outcome of a
/// [`OrderBook::submit`] call: the order's final status, any trades that
/// occurred immediately, and — if the order rests — where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReport {
    /// The id assigned to (or carried by) the submitted order.
    pub order_id: OrderId,
    /// The order's status once submission finished.
    pub status: OrderStatus,
    /// Trades executed during this submission, oldest first.
    pub trades: Vec<Trade>,
    /// Where the order rests, if it does.
    pub resting: Option<RestingInfo>,
}

/// Where an order rests on the book after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingInfo {
    /// The level the order rests at.
    pub price: u64,
    /// The order's remaining quantity at the time of this report.
    pub remaining_quantity: u64,
}

/// Fields the caller supplies when submitting a new order.
///
/// `client_id` is optional (spec §6): when omitted, the book assigns a
/// fresh `Uuid::new_v4()` that can never collide; when supplied, the
/// book rejects it with [`OrderBookError::OrderExists`] if an order
/// with that id is already resting.
pub struct NewOrder {
    /// Opaque identifier of the submitter.
    pub owner_id: String,
    /// Must match the book's own symbol.
    pub symbol: String,
    /// BUY or SELL.
    pub side: Side,
    /// LIMIT, MARKET, or STOP.
    pub kind: OrderKind,
    /// Required for `Limit`/`Stop`; ignored for `Market`.
    pub limit_price: Option<u64>,
    /// Must be strictly positive.
    pub quantity: u64,
    /// Caller-supplied id, if any (spec §6). `None` lets the book
    /// assign one.
    pub client_id: Option<OrderId>,
}

impl OrderBook {
    /// Admits `request`, matches it against resting liquidity, and either
    /// rests the remainder (`Limit`/`Stop`) or rejects it (`Market`) per
    /// spec §4.3-§4.4.
    ///
    /// # Errors
    /// Returns [`OrderBookError::InvalidRequest`] if the symbol doesn't
    /// match, the quantity isn't strictly positive, or a `Limit`/`Stop`
    /// order has no (or a non-positive) limit price. Validation never
    /// mutates book state.
    pub fn submit(&self, request: NewOrder) -> Result<SubmitReport, OrderBookError> {
        validate(&request, self.symbol())?;

        let now = now_millis();
        let id = request.client_id.unwrap_or_else(OrderId::new_v4);
        let mut order = Order {
            id,
            owner_id: request.owner_id,
            symbol: request.symbol,
            side: request.side,
            kind: request.kind,
            limit_price: request.limit_price,
            original_quantity: request.quantity,
            filled_quantity: 0,
            status: OrderStatus::New,
            created_at: now,
            updated_at: now,
        };

        trace!(order_id = %order.id, side = %order.side, kind = %order.kind, quantity = order.original_quantity, "order admitted");

        let mut state = self.state.write();
        if request.client_id.is_some() && state.order_locations.contains_key(&order.id) {
            return Err(OrderBookError::OrderExists(order.id));
        }
        let trades = match_order(&mut state, &mut order, now);

        if !trades.is_empty() {
            debug!(order_id = %order.id, fills = trades.len(), "order matched against resting liquidity");
        }

        let remaining = order.remaining_quantity();
        let resting = if remaining == 0 {
            None
        } else {
            match order.kind {
                OrderKind::Market => {
                    order.status = OrderStatus::Rejected;
                    warn!(order_id = %order.id, remaining, "market order rejected for insufficient liquidity");
                    None
                }
                OrderKind::Limit | OrderKind::Stop => {
                    let price = order
                        .limit_price
                        .expect("Limit/Stop orders always carry a limit price");
                    let side = order.side;
                    let id = order.id;
                    let book_side = match side {
                        Side::Buy => &mut state.bids,
                        Side::Sell => &mut state.asks,
                    };
                    book_side
                        .entry(price)
                        .or_insert_with(|| PriceLevel::new(price))
                        .append(order.clone());
                    state.order_locations.insert(id, (side, price));
                    Some(RestingInfo {
                        price,
                        remaining_quantity: remaining,
                    })
                }
            }
        };

        let report = SubmitReport {
            order_id: order.id,
            status: order.status,
            trades,
            resting,
        };
        drop(state);
        Ok(report)
    }

    /// Cancels a resting order, freeing its quantity from the book.
    ///
    /// # Errors
    /// [`OrderBookError::NotFound`] if no such order is resting;
    /// [`OrderBookError::AlreadyTerminal`] is not reachable through this
    /// path today since terminal orders are never tracked in
    /// `order_locations`, but is reserved for future statuses (e.g. an
    /// order paused by a risk check) that might be.
    pub fn cancel(&self, order_id: OrderId) -> Result<Order, OrderBookError> {
        let mut state = self.state.write();
        let Some((side, price)) = state.order_locations.remove(&order_id) else {
            return Err(OrderBookError::NotFound(order_id));
        };

        let book_side = match side {
            Side::Buy => &mut state.bids,
            Side::Sell => &mut state.asks,
        };
        let Some(level) = book_side.get_mut(&price) else {
            return Err(OrderBookError::NotFound(order_id));
        };
        let Some(mut order) = level.remove(order_id) else {
            return Err(OrderBookError::NotFound(order_id));
        };
        if level.is_empty() {
            book_side.remove(&price);
        }

        order.status = OrderStatus::Cancelled;
        order.updated_at = now_millis();
        trace!(order_id = %order.id, "order cancelled");
        Ok(order)
    }

    /// Looks up a resting order by id.
    ///
    /// # Errors
    /// [`OrderBookError::NotFound`] if no such order is currently
    /// resting (it may never have existed, or may already be terminal).
    pub fn get_order(&self, order_id: OrderId) -> Result<Order, OrderBookError> {
        let state = self.state.read();
        state
            .get(&order_id)
            .cloned()
            .ok_or(OrderBookError::NotFound(order_id))
    }

    /// Takes a point-in-time snapshot of both sides' aggregate levels,
    /// best price first (spec §6).
    #[must_use]
    pub fn snapshot(&self) -> OrderBookSnapshot {
        let state = self.state.read();
        let bids = state
            .bids
            .iter()
            .rev()
            .map(|(price, level)| level_info(*price, level))
            .collect();
        let asks = state
            .asks
            .iter()
            .map(|(price, level)| level_info(*price, level))
            .collect();

        OrderBookSnapshot {
            symbol: self.symbol().to_owned(),
            timestamp: now_millis(),
            bids,
            asks,
        }
    }
}

fn level_info(price: u64, level: &PriceLevel) -> LevelInfo {
    LevelInfo {
        price,
        aggregate_quantity: level.aggregate_remaining(),
        order_count: level.order_count(),
    }
}

fn validate(request: &NewOrder, book_symbol: &str) -> Result<(), OrderBookError> {
    if request.symbol != book_symbol {
        return Err(OrderBookError::InvalidRequest(format!(
            "order symbol {} does not match book symbol {book_symbol}",
            request.symbol
        )));
    }
    if request.quantity == 0 {
        return Err(OrderBookError::InvalidRequest(
            "quantity must be strictly positive".into(),
        ));
    }
    match request.kind {
        OrderKind::Limit | OrderKind::Stop => match request.limit_price {
            Some(price) if price > 0 => Ok(()),
            Some(_) => Err(OrderBookError::InvalidRequest(
                "limit price must be strictly positive".into(),
            )),
            None => Err(OrderBookError::InvalidRequest(
                "limit/stop orders require a limit price".into(),
            )),
        },
        OrderKind::Market => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(book: &OrderBook, side: Side, price: u64, quantity: u64) -> SubmitReport {
        book.submit(NewOrder {
            owner_id: "owner".into(),
            symbol: book.symbol().to_owned(),
            side,
            kind: OrderKind::Limit,
            limit_price: Some(price),
            quantity,
            client_id: None,
        })
        .unwrap()
    }

    #[test]
    fn resting_limit_order_appears_in_snapshot() {
        let book = OrderBook::new("BTC/USD");
        let report = limit(&book, Side::Buy, 100, 5);
        assert_eq!(report.status, OrderStatus::New);
        assert!(report.trades.is_empty());

        let snapshot = book.snapshot();
        assert_eq!(snapshot.best_bid(), Some(100));
        assert_eq!(snapshot.bids[0].aggregate_quantity, 5);
    }

    #[test]
    fn crossing_order_produces_trade_and_fills_both_sides() {
        let book = OrderBook::new("BTC/USD");
        limit(&book, Side::Sell, 100, 5);
        let report = limit(&book, Side::Buy, 100, 5);

        assert_eq!(report.status, OrderStatus::Filled);
        assert_eq!(report.trades.len(), 1);
        assert!(book.snapshot().asks.is_empty());
    }

    #[test]
    fn market_order_rejects_when_it_cannot_fully_fill() {
        let book = OrderBook::new("BTC/USD");
        limit(&book, Side::Sell, 100, 2);
        let report = book
            .submit(NewOrder {
                owner_id: "owner".into(),
                symbol: "BTC/USD".into(),
                side: Side::Buy,
                kind: OrderKind::Market,
                limit_price: None,
                quantity: 5,
                client_id: None,
            })
            .unwrap();

        assert_eq!(report.status, OrderStatus::Rejected);
        assert_eq!(report.trades.len(), 1);
        assert!(report.resting.is_none());
        assert!(book.get_order(report.order_id).is_err());
    }

    #[test]
    fn cancel_removes_order_from_book() {
        let book = OrderBook::new("BTC/USD");
        let report = limit(&book, Side::Buy, 100, 5);

        let cancelled = book.cancel(report.order_id).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(book.snapshot().bids.is_empty());
        assert!(matches!(
            book.cancel(report.order_id),
            Err(OrderBookError::NotFound(_))
        ));
    }

    #[test]
    fn submit_rejects_wrong_symbol() {
        let book = OrderBook::new("BTC/USD");
        let result = book.submit(NewOrder {
            owner_id: "owner".into(),
            symbol: "ETH/USD".into(),
            side: Side::Buy,
            kind: OrderKind::Limit,
            limit_price: Some(100),
            quantity: 1,
            client_id: None,
        });
        assert!(matches!(result, Err(OrderBookError::InvalidRequest(_))));
    }

    #[test]
    fn fifo_within_a_price_level_is_preserved() {
        let book = OrderBook::new("BTC/USD");
        let first = limit(&book, Side::Sell, 100, 5);
        let _second = limit(&book, Side::Sell, 100, 5);

        let report = limit(&book, Side::Buy, 100, 5);
        assert_eq!(report.trades[0].sell_order_id, first.order_id);
    }

    #[test]
    fn duplicate_client_id_is_rejected_without_mutating_the_book() {
        let book = OrderBook::new("BTC/USD");
        let id = OrderId::new_v4();
        book.submit(NewOrder {
            owner_id: "owner".into(),
            symbol: "BTC/USD".into(),
            side: Side::Buy,
            kind: OrderKind::Limit,
            limit_price: Some(100),
            quantity: 5,
            client_id: Some(id),
        })
        .unwrap();

        let result = book.submit(NewOrder {
            owner_id: "owner".into(),
            symbol: "BTC/USD".into(),
            side: Side::Sell,
            kind: OrderKind::Limit,
            limit_price: Some(101),
            quantity: 1,
            client_id: Some(id),
        });

        assert!(matches!(result, Err(OrderBookError::OrderExists(existing)) if existing == id));
        let snapshot = book.snapshot();
        assert_eq!(snapshot.bids[0].aggregate_quantity, 5);
        assert!(snapshot.asks.is_empty());
    }

    #[test]
    fn client_supplied_id_is_honored_and_resolvable() {
        let book = OrderBook::new("BTC/USD");
        let id = OrderId::new_v4();
        let report = book
            .submit(NewOrder {
                owner_id: "owner".into(),
                symbol: "BTC/USD".into(),
                side: Side::Buy,
                kind: OrderKind::Limit,
                limit_price: Some(100),
                quantity: 5,
                client_id: Some(id),
            })
            .unwrap();

        assert_eq!(report.order_id, id);
        assert_eq!(book.get_order(id).unwrap().id, id);
    }
}
