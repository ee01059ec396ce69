//! Concurrency properties: many threads submitting against one book
//! never corrupt its invariants, and different symbols' books never
//! contend with each other (spec §5, §8 P6/P7).

use matching_core::{MatchingEngine, NewOrder, OrderKind, Side};
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_submissions_on_one_book_conserve_quantity() {
    let book = Arc::new(matching_core::OrderBook::new("BTC/USD"));
    const THREADS: usize = 8;
    const ORDERS_PER_THREAD: u64 = 50;

    thread::scope(|scope| {
        for thread_index in 0..THREADS {
            let book = Arc::clone(&book);
            scope.spawn(move || {
                let side = if thread_index % 2 == 0 { Side::Buy } else { Side::Sell };
                for i in 0..ORDERS_PER_THREAD {
                    book.submit(NewOrder {
                        owner_id: format!("trader-{thread_index}"),
                        symbol: "BTC/USD".into(),
                        side,
                        kind: OrderKind::Limit,
                        limit_price: Some(100 + (i % 5)),
                        quantity: 1,
                        client_id: None,
                    })
                    .expect("well-formed order");
                }
            });
        }
    });

    let snapshot = book.snapshot();
    let resting: u64 = snapshot
        .bids
        .iter()
        .chain(snapshot.asks.iter())
        .map(|level| level.aggregate_quantity)
        .sum();
    let submitted = THREADS as u64 * ORDERS_PER_THREAD;
    // Every unit of quantity submitted is either still resting or was
    // consumed by exactly one trade; since every trade consumes equal
    // quantity from both a buy and a sell order, resting quantity must
    // have the same parity distance from submitted on each side as the
    // number of completed trades, and can never exceed what was submitted.
    assert!(resting <= submitted);
}

#[test]
fn concurrent_access_across_symbols_does_not_cross_contaminate() {
    let engine = Arc::new(MatchingEngine::new());
    engine.add_symbol("BTC/USD").unwrap();
    engine.add_symbol("ETH/USD").unwrap();

    thread::scope(|scope| {
        let engine_a = Arc::clone(&engine);
        scope.spawn(move || {
            let book = engine_a.book("BTC/USD").unwrap();
            for _ in 0..100 {
                book.submit(NewOrder {
                    owner_id: "btc-trader".into(),
                    symbol: "BTC/USD".into(),
                    side: Side::Buy,
                    kind: OrderKind::Limit,
                    limit_price: Some(50_000),
                    quantity: 1,
                    client_id: None,
                })
                .unwrap();
            }
        });

        let engine_b = Arc::clone(&engine);
        scope.spawn(move || {
            let book = engine_b.book("ETH/USD").unwrap();
            for _ in 0..100 {
                book.submit(NewOrder {
                    owner_id: "eth-trader".into(),
                    symbol: "ETH/USD".into(),
                    side: Side::Sell,
                    kind: OrderKind::Limit,
                    limit_price: Some(3_000),
                    quantity: 1,
                    client_id: None,
                })
                .unwrap();
            }
        });
    });

    let btc_snapshot = engine.book("BTC/USD").unwrap().snapshot();
    let eth_snapshot = engine.book("ETH/USD").unwrap().snapshot();

    assert_eq!(btc_snapshot.bids[0].aggregate_quantity, 100);
    assert!(btc_snapshot.asks.is_empty());
    assert_eq!(eth_snapshot.asks[0].aggregate_quantity, 100);
    assert!(eth_snapshot.bids.is_empty());
}
