//! The price-time priority matching procedure (spec §4.3).
//!
//! This module is deliberately free of locking concerns: [`match_order`]
//! takes an already-held `&mut BookState` and a `&mut Order` (the taker)
//! and runs to completion, producing the trades that occurred. The
//! caller (`operations::submit`) owns the write guard for the whole
//! call.

use super::book::BookState;
use super::order::{Order, Side};
use super::trade::Trade;
use uuid::Uuid;

/// Matches `taker` against the book side opposite `taker.side`, walking
/// price levels best-first and, within a level, oldest-first (spec
/// invariant I6).
///
/// Stops when `taker` is fully filled or no remaining level crosses.
/// Never mutates `taker.status` directly — the caller derives the final
/// status from `taker.remaining_quantity()` and `taker.kind` once
/// matching (and, for `Limit`/`Stop`, resting) is complete.
pub(super) fn match_order(state: &mut BookState, taker: &mut Order, now: u64) -> Vec<Trade> {
    let mut trades = Vec::new();

    loop {
        if taker.remaining_quantity() == 0 {
            break;
        }

        let Some(best_price) = best_opposite_price(state, taker.side) else {
            break;
        };

        if !crosses(taker, best_price) {
            break;
        }

        let opposite = opposite_side_map(state, taker.side);
        let level = opposite.get_mut(&best_price).expect("best_price came from this map");

        let maker_id = {
            let maker = level.front().expect("a price level is never left empty");
            maker.id
        };

        let fill_quantity = {
            let maker = level.front().expect("checked above");
            taker.remaining_quantity().min(maker.remaining_quantity())
        };

        taker.apply_fill(fill_quantity, now);
        level.partial_fill_head(fill_quantity, now);

        let maker_snapshot = level.peek(&maker_id);
        let maker_remaining = maker_snapshot.map(Order::remaining_quantity).unwrap_or(0);
        let maker_owner = maker_snapshot
            .map(|order| order.owner_id.clone())
            .unwrap_or_default();

        trades.push(build_trade(taker, maker_id, &maker_owner, best_price, fill_quantity, now));

        if maker_remaining == 0 {
            let filled_maker = level.pop_head().expect("head was just fully filled");
            state
                .order_locations
                .remove(&filled_maker.id)
                .expect("a resting order is always tracked in order_locations");
        }

        let opposite = opposite_side_map(state, taker.side);
        if opposite
            .get(&best_price)
            .map(super::price_level::PriceLevel::is_empty)
            .unwrap_or(false)
        {
            opposite.remove(&best_price);
        }
    }

    trades
}

fn best_opposite_price(state: &BookState, taker_side: Side) -> Option<u64> {
    match taker_side {
        Side::Buy => state.asks.keys().next().copied(),
        Side::Sell => state.bids.keys().next_back().copied(),
    }
}

fn opposite_side_map(
    state: &mut BookState,
    taker_side: Side,
) -> &mut std::collections::BTreeMap<u64, super::price_level::PriceLevel> {
    match taker_side {
        Side::Buy => &mut state.asks,
        Side::Sell => &mut state.bids,
    }
}

/// Whether `taker` is willing to trade at `maker_price`.
///
/// `Market` always crosses. `Limit`/`Stop` cross only if the maker's
/// price is at least as good as the taker's limit (spec §4.3).
fn crosses(taker: &Order, maker_price: u64) -> bool {
    match taker.kind {
        super::order::OrderKind::Market => true,
        super::order::OrderKind::Limit | super::order::OrderKind::Stop => {
            let limit = taker
                .limit_price
                .expect("Limit/Stop orders always carry a limit price");
            match taker.side {
                Side::Buy => limit >= maker_price,
                Side::Sell => limit <= maker_price,
            }
        }
    }
}

fn build_trade(
    taker: &Order,
    maker_id: Uuid,
    maker_owner: &str,
    price: u64,
    quantity: u64,
    now: u64,
) -> Trade {
    let (buy_order_id, sell_order_id, buyer_owner_id, seller_owner_id) = match taker.side {
        Side::Buy => (taker.id, maker_id, taker.owner_id.clone(), maker_owner.to_owned()),
        Side::Sell => (maker_id, taker.id, maker_owner.to_owned(), taker.owner_id.clone()),
    };

    Trade {
        id: Uuid::new_v4(),
        symbol: taker.symbol.clone(),
        buy_order_id,
        sell_order_id,
        buyer_owner_id,
        seller_owner_id,
        price,
        quantity,
        executed_at: now,
    }
}
