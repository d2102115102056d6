//! Order entity implementation.

use chrono::{DateTime, Utc};
use common::{OrderId, TableNumber};
use serde::Serialize;
use store::Record;

use crate::aggregate::Entity;
use crate::error::{DomainError, Result};

use super::{
    MAX_PRICE, MAX_QUANTITY, MAX_TOTAL, Money, NewOrder, OrderEvent, OrderItem, OrderPatch,
    OrderStatus,
    events::{OrderCorrectedData, OrderPlacedData},
};

/// An order taken at a table.
///
/// `total` is set once when the order is placed and only changes through an
/// explicit correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    table_number: TableNumber,
    items: Vec<OrderItem>,
    total: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Record for Order {
    type Id = OrderId;

    fn record_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> OrderId {
        self.id
    }
}

impl Entity for Order {
    type Event = OrderEvent;

    fn apply(&mut self, event: Self::Event) {
        match event {
            OrderEvent::OrderPlaced(data) => self.apply_placed(data),
            OrderEvent::OrderStatusAdvanced(data) => {
                self.status = data.to;
            }
            OrderEvent::OrderCorrected(data) => self.apply_corrected(data),
            OrderEvent::OrderRemoved(_) => {
                // Removal is handled by the owning collection
            }
        }
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn table_number(&self) -> TableNumber {
        self.table_number
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the sum of item subtotals, which may differ from `total`.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::subtotal).sum()
    }
}

// Command methods (return events)
impl Order {
    /// Builds a new order with the given id, stamped now.
    ///
    /// Always starts `Ordered`; any requested status is ignored.
    pub fn place(id: OrderId, new: NewOrder) -> Result<(Order, Vec<OrderEvent>)> {
        Self::place_at(id, new, Utc::now())
    }

    pub(crate) fn place_at(
        id: OrderId,
        new: NewOrder,
        created_at: DateTime<Utc>,
    ) -> Result<(Order, Vec<OrderEvent>)> {
        let items_total = validate_items(&new.items)?;
        let total = match new.total {
            Some(total) => validate_total(total)?,
            None => items_total,
        };

        let order = Order {
            id,
            table_number: new.table_number,
            items: Vec::new(),
            total: Money::zero(),
            status: OrderStatus::Ordered,
            created_at,
        };
        let event = OrderEvent::OrderPlaced(OrderPlacedData {
            table_number: new.table_number,
            items: new.items,
            total,
            created_at,
        });

        Ok((order, vec![event]))
    }

    /// Moves the order to `target`, which must be the immediate next stage.
    pub fn advance_to(&self, target: OrderStatus) -> Result<Vec<OrderEvent>> {
        if !self.status.can_advance_to(target) {
            return Err(DomainError::invalid_transition(
                Self::record_type(),
                self.status,
                target,
            ));
        }

        Ok(vec![OrderEvent::status_advanced(self.status, target)])
    }

    /// Moves the order to the next stage.
    pub fn advance(&self) -> Result<Vec<OrderEvent>> {
        match self.status.next() {
            Some(next) => self.advance_to(next),
            None => Err(DomainError::invalid_transition(
                Self::record_type(),
                self.status,
                "none",
            )),
        }
    }

    /// Corrects table, items or total. The total is not recomputed.
    pub fn correct(&self, patch: OrderPatch) -> Result<Vec<OrderEvent>> {
        let mut data = OrderCorrectedData::default();

        if let Some(table_number) = patch.table_number
            && table_number != self.table_number
        {
            data.table_number = Some(table_number);
        }
        if let Some(items) = patch.items {
            validate_items(&items)?;
            if items != self.items {
                data.items = Some(items);
            }
        }
        if let Some(total) = patch.total {
            let total = validate_total(total)?;
            if total != self.total {
                data.total = Some(total);
            }
        }

        Ok(OrderEvent::corrected(data).into_iter().collect())
    }

    /// Records the deletion of the order.
    pub fn remove(&self) -> Vec<OrderEvent> {
        vec![OrderEvent::removed(self.status)]
    }
}

// Apply event helpers
impl Order {
    fn apply_placed(&mut self, data: OrderPlacedData) {
        self.table_number = data.table_number;
        self.items = data.items;
        self.total = data.total;
        self.status = OrderStatus::Ordered;
        self.created_at = data.created_at;
    }

    fn apply_corrected(&mut self, data: OrderCorrectedData) {
        if let Some(table_number) = data.table_number {
            self.table_number = table_number;
        }
        if let Some(items) = data.items {
            self.items = items;
        }
        if let Some(total) = data.total {
            self.total = total;
        }
    }
}

/// Checks every line and returns their sum.
fn validate_items(items: &[OrderItem]) -> Result<Money> {
    let mut sum = Money::zero();
    for item in items {
        if item.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("item name is required".to_string()));
        }
        if item.quantity == 0 || item.quantity > MAX_QUANTITY {
            return Err(DomainError::InvalidInput(format!(
                "quantity of {} must be between 1 and {MAX_QUANTITY}",
                item.name
            )));
        }
        if item.price.is_negative() || item.price > MAX_PRICE {
            return Err(DomainError::InvalidInput(format!(
                "price of {} must be between $0.00 and {MAX_PRICE}",
                item.name
            )));
        }

        sum = item
            .price
            .checked_times(item.quantity)
            .and_then(|subtotal| sum.checked_add(subtotal))
            .filter(|sum| *sum <= MAX_TOTAL)
            .ok_or_else(|| {
                DomainError::InvalidInput(format!("order total cannot exceed {MAX_TOTAL}"))
            })?;
    }
    Ok(sum)
}

fn validate_total(total: Money) -> Result<Money> {
    if total.is_negative() || total > MAX_TOTAL {
        return Err(DomainError::InvalidInput(format!(
            "total must be between $0.00 and {MAX_TOTAL}"
        )));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<OrderItem> {
        vec![
            OrderItem::new("Margherita", 2, Money::from_cents(1200)),
            OrderItem::new("Lemonade", 1, Money::from_cents(350)),
        ]
    }

    fn placed(new: NewOrder) -> Order {
        let (mut order, events) = Order::place(OrderId::new(1), new).unwrap();
        order.apply_events(events);
        order
    }

    #[test]
    fn test_place_defaults_total_to_item_sum() {
        let order = placed(NewOrder::new(3, items()));
        assert_eq!(order.status(), OrderStatus::Ordered);
        assert_eq!(order.table_number(), TableNumber::new(3));
        assert_eq!(order.total(), Money::from_cents(2750));
        assert_eq!(order.items().len(), 2);
    }

    #[test]
    fn test_place_ignores_requested_status() {
        let mut new = NewOrder::new(3, items());
        new.status = Some(OrderStatus::Served);
        assert_eq!(placed(new).status(), OrderStatus::Ordered);
    }

    #[test]
    fn test_place_keeps_explicit_total() {
        let mut new = NewOrder::new(3, items());
        new.total = Some(Money::from_cents(2500));
        let order = placed(new);
        assert_eq!(order.total(), Money::from_cents(2500));
        assert_eq!(order.items_total(), Money::from_cents(2750));
    }

    #[test]
    fn test_place_validates_items() {
        let zero_quantity = NewOrder::new(1, vec![OrderItem::new("Soup", 0, Money::from_cents(500))]);
        let negative_price = NewOrder::new(1, vec![OrderItem::new("Soup", 1, Money::from_cents(-1))]);

        for new in [zero_quantity, negative_price] {
            let result = Order::place(OrderId::new(1), new);
            assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_place_rejects_out_of_range_amounts() {
        let cases = [
            vec![OrderItem::new("Caviar", 10, Money::from_cents(i64::MAX / 2))],
            vec![OrderItem::new("Caviar", 1, Money::from_cents(MAX_PRICE.cents() + 1))],
            vec![OrderItem::new("Olives", MAX_QUANTITY + 1, Money::from_cents(400))],
            vec![
                OrderItem::new("Wine", MAX_QUANTITY, MAX_PRICE),
                OrderItem::new("Bread", 1, Money::from_cents(100)),
            ],
        ];

        for items in cases {
            let result = Order::place(OrderId::new(1), NewOrder::new(1, items));
            assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        }

        let mut new = NewOrder::new(1, items());
        new.total = Some(Money::from_cents(i64::MAX));
        let result = Order::place(OrderId::new(1), new);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_place_accepts_amounts_at_the_caps() {
        let order = placed(NewOrder::new(1, vec![OrderItem::new("Wine", 10, MAX_PRICE)]));
        assert_eq!(order.total(), MAX_TOTAL);
    }

    #[test]
    fn test_free_item_is_allowed() {
        let order = placed(NewOrder::new(1, vec![OrderItem::new("Bread", 1, Money::zero())]));
        assert_eq!(order.total(), Money::zero());
    }

    #[test]
    fn test_advance_through_pipeline() {
        let mut order = placed(NewOrder::new(1, items()));
        for expected in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Served,
            OrderStatus::Completed,
        ] {
            let events = order.advance().unwrap();
            order.apply_events(events);
            assert_eq!(order.status(), expected);
        }

        assert!(matches!(
            order.advance(),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_advance_to_rejects_skips_and_backward_moves() {
        let order = placed(NewOrder::new(1, items()));
        assert!(order.advance_to(OrderStatus::Ready).is_err());
        assert!(order.advance_to(OrderStatus::Ordered).is_err());
        assert_eq!(order.advance_to(OrderStatus::Preparing).unwrap().len(), 1);
    }

    #[test]
    fn test_correct_does_not_recompute_total() {
        let mut order = placed(NewOrder::new(1, items()));
        let events = order
            .correct(OrderPatch {
                items: Some(vec![OrderItem::new("Soup", 1, Money::from_cents(600))]),
                ..Default::default()
            })
            .unwrap();
        order.apply_events(events);

        assert_eq!(order.items().len(), 1);
        assert_eq!(order.total(), Money::from_cents(2750));
    }

    #[test]
    fn test_correct_with_same_values_is_noop() {
        let order = placed(NewOrder::new(1, items()));
        let events = order
            .correct(OrderPatch {
                table_number: Some(TableNumber::new(1)),
                ..Default::default()
            })
            .unwrap();
        assert!(events.is_empty());
    }
}
