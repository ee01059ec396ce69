//! `PriceLevel` — the FIFO queue of resting orders at one exact price.

use super::order::{Order, OrderId};
use std::collections::{HashMap, VecDeque};

/// The FIFO queue of all resting orders at one exact price on one side,
/// plus the running aggregate of their remaining quantity.
///
/// Orders are looked up by id in a `HashMap` for O(1) average
/// modification and removal; arrival order (spec invariant I6) is kept
/// separately in a `VecDeque` of ids. Removing an order by id (cancel, or
/// a self-trade-prevention cleanup) only touches the map — the queue
/// entry is left in place and skipped lazily the next time the head is
/// inspected, avoiding an O(n) shift on every cancel.
#[derive(Debug)]
pub struct PriceLevel {
    price: u64,
    orders: HashMap<OrderId, Order>,
    arrival: VecDeque<OrderId>,
    aggregate_remaining: u64,
}

impl PriceLevel {
    /// Creates an empty level at `price`.
    pub fn new(price: u64) -> Self {
        Self {
            price,
            orders: HashMap::new(),
            arrival: VecDeque::new(),
            aggregate_remaining: 0,
        }
    }

    /// The price this level represents.
    #[must_use]
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Pushes `order` to the tail and adds its remaining quantity to the
    /// aggregate.
    ///
    /// # Panics
    /// In debug builds, panics if `order.limit_price != Some(self.price)`.
    pub fn append(&mut self, order: Order) {
        debug_assert_eq!(
            order.limit_price,
            Some(self.price),
            "an order may only be appended to the level matching its limit price"
        );
        self.aggregate_remaining += order.remaining_quantity();
        self.arrival.push_back(order.id);
        self.orders.insert(order.id, order);
    }

    /// Drops arrival entries for orders no longer present (already
    /// removed via [`PriceLevel::remove`] or a prior [`PriceLevel::pop_head`]).
    fn drain_stale_head(&mut self) {
        while let Some(id) = self.arrival.front() {
            if self.orders.contains_key(id) {
                break;
            }
            self.arrival.pop_front();
        }
    }

    /// Peeks the head of the queue (earliest-arrived live order), if any.
    pub fn front(&mut self) -> Option<&Order> {
        self.drain_stale_head();
        let id = *self.arrival.front()?;
        self.orders.get(&id)
    }

    /// Looks up a live order at this level by id without disturbing
    /// arrival order. Used by [`super::book::BookState::get`].
    pub(super) fn peek(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Decrements the head order's remaining quantity by `quantity` and
    /// the level's aggregate by the same amount, stamping `now` as its
    /// update time. Returns the head order's id.
    ///
    /// # Panics
    /// Panics if the level is empty, or (in debug builds) if `quantity`
    /// is zero or exceeds the head's remaining quantity.
    pub fn partial_fill_head(&mut self, quantity: u64, now: u64) -> OrderId {
        self.drain_stale_head();
        let id = *self.arrival.front().expect("partial_fill_head on empty level");
        let order = self.orders.get_mut(&id).expect("arrival/orders desync");
        order.apply_fill(quantity, now);
        self.aggregate_remaining -= quantity;
        id
    }

    /// Removes and returns the head of the queue, decrementing the
    /// aggregate by its (usually zero, post-fill) remaining quantity.
    /// Called once a head order is fully filled or cancelled.
    pub fn pop_head(&mut self) -> Option<Order> {
        self.drain_stale_head();
        let id = self.arrival.pop_front()?;
        let order = self.orders.remove(&id)?;
        self.aggregate_remaining = self.aggregate_remaining.saturating_sub(order.remaining_quantity());
        Some(order)
    }

    /// Removes a specific order by id, decrementing the aggregate by its
    /// remaining quantity. Used by cancellation.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let order = self.orders.remove(&id)?;
        self.aggregate_remaining = self.aggregate_remaining.saturating_sub(order.remaining_quantity());
        Some(order)
    }

    /// Whether any live orders remain at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of live resting orders at this level (spec invariant I4).
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Sum of all live resting orders' remaining quantities (spec
    /// invariant I2).
    #[must_use]
    pub fn aggregate_remaining(&self) -> u64 {
        self.aggregate_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::order::{OrderKind, OrderStatus, Side};
    use uuid::Uuid;

    fn resting_order(price: u64, quantity: u64) -> Order {
        Order {
            id: Uuid::new_v4(),
            owner_id: "owner".into(),
            symbol: "BTC/USD".into(),
            side: Side::Buy,
            kind: OrderKind::Limit,
            limit_price: Some(price),
            original_quantity: quantity,
            filled_quantity: 0,
            status: OrderStatus::New,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn append_updates_aggregate() {
        let mut level = PriceLevel::new(10);
        level.append(resting_order(10, 5));
        level.append(resting_order(10, 7));
        assert_eq!(level.aggregate_remaining(), 12);
        assert_eq!(level.order_count(), 2);
    }

    #[test]
    fn fifo_order_is_preserved_through_cancel() {
        let mut level = PriceLevel::new(10);
        let a = resting_order(10, 5);
        let b = resting_order(10, 5);
        let c = resting_order(10, 5);
        let (a_id, b_id, c_id) = (a.id, b.id, c.id);
        level.append(a);
        level.append(b);
        level.append(c);

        level.remove(b_id);
        assert_eq!(level.front().unwrap().id, a_id);
        let popped = level.pop_head().unwrap();
        assert_eq!(popped.id, a_id);
        assert_eq!(level.front().unwrap().id, c_id);
    }

    #[test]
    fn partial_fill_head_decrements_aggregate_and_order() {
        let mut level = PriceLevel::new(10);
        let order = resting_order(10, 10);
        let id = order.id;
        level.append(order);

        let filled_id = level.partial_fill_head(4, 1);
        assert_eq!(filled_id, id);
        assert_eq!(level.aggregate_remaining(), 6);
        assert_eq!(level.front().unwrap().remaining_quantity(), 6);
        assert_eq!(level.front().unwrap().status, OrderStatus::Partial);
    }

    #[test]
    fn pop_head_after_full_fill_empties_level() {
        let mut level = PriceLevel::new(10);
        level.append(resting_order(10, 3));

        level.partial_fill_head(3, 1);
        let popped = level.pop_head().unwrap();
        assert_eq!(popped.status, OrderStatus::Filled);
        assert!(level.is_empty());
        assert_eq!(level.aggregate_remaining(), 0);
    }
}
