//! The cart: an ordered list of line items and the totals derived from it.
//!
//! Insertion order is display order. Every operation keeps two invariants:
//! no entry has a quantity of zero, and no two entries share a name and a
//! price (adding a duplicate bumps the existing quantity instead).
//!
//! The subtotal and the total unit count must also stay representable.
//! Mutations that would overflow either are rejected and leave the cart
//! unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shipping::{ShippingPolicy, Totals};
use crate::types::{LineItemId, Price};

/// Errors returned by cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// An add-item request was missing or malformed, or a change would
    /// take the cart past what it can hold.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Which input was rejected.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
    /// No line item has the given id.
    #[error("no cart item with id {0}")]
    NotFound(LineItemId),
}

/// A product entry in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub name: String,
    pub price: Price,
    /// Image URI. Older carts stored this as `imgSrc`.
    #[serde(alias = "imgSrc", default)]
    pub image: String,
    pub quantity: u32,
}

impl LineItem {
    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// A validated request to add one unit of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub name: String,
    pub price: Price,
    pub image: String,
}

impl NewLineItem {
    /// Validate raw product fields.
    ///
    /// The name is trimmed and must not be empty. The price accepts the
    /// card format understood by [`Price::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInput`] naming the offending field.
    pub fn parse(name: &str, price: &str, image: &str) -> Result<Self, CartError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CartError::InvalidInput {
                field: "name",
                reason: "product name cannot be empty".to_string(),
            });
        }

        let price = Price::parse(price).map_err(|e| CartError::InvalidInput {
            field: "price",
            reason: e.to_string(),
        })?;

        Ok(Self {
            name: name.to_owned(),
            price,
            image: image.trim().to_owned(),
        })
    }
}

/// What [`Cart::add`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was appended.
    Inserted(LineItemId),
    /// An entry with the same name and price already existed.
    Incremented { id: LineItemId, quantity: u32 },
}

impl AddOutcome {
    /// Id of the entry that now holds the product.
    #[must_use]
    pub const fn id(&self) -> &LineItemId {
        match self {
            Self::Inserted(id) | Self::Incremented { id, .. } => id,
        }
    }
}

/// What [`Cart::adjust_quantity`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// The entry remains with a new positive quantity.
    Updated { id: LineItemId, quantity: u32 },
    /// The quantity dropped to zero or below and the entry was removed.
    Removed(LineItem),
}

/// Ordered list of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from previously stored items.
    ///
    /// Entries with a zero quantity are dropped, and entries repeating an
    /// earlier name and price are folded into it. Entries that would push the
    /// subtotal or unit count past their limits are dropped.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 || cart.ensure_room(item.quantity, item.price).is_err() {
                continue;
            }
            match cart.position_of_product(&item.name, item.price) {
                Some(pos) => {
                    if let Some(existing) = cart.items.get_mut(pos) {
                        existing.quantity += item.quantity;
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of a product.
    ///
    /// Matches existing entries by name and price only. Ids are generated per
    /// add, so including them in the match would never find a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInput`] if the extra unit would overflow
    /// the subtotal or unit count; the cart is unchanged.
    pub fn add(&mut self, new: NewLineItem) -> Result<AddOutcome, CartError> {
        self.ensure_room(1, new.price)?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.name == new.name && item.price == new.price)
        {
            existing.quantity += 1;
            return Ok(AddOutcome::Incremented {
                id: existing.id.clone(),
                quantity: existing.quantity,
            });
        }

        let id = LineItemId::generate();
        self.items.push(LineItem {
            id: id.clone(),
            name: new.name,
            price: new.price,
            image: new.image,
            quantity: 1,
        });
        Ok(AddOutcome::Inserted(id))
    }

    /// Add `delta` to an entry's quantity, removing it if the result is not
    /// positive.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if no entry has `id`, or
    /// [`CartError::InvalidInput`] if the new quantity does not fit in a
    /// `u32` or would overflow the subtotal or unit count. The cart is
    /// unchanged on error.
    pub fn adjust_quantity(
        &mut self,
        id: &LineItemId,
        delta: i64,
    ) -> Result<QuantityChange, CartError> {
        let (pos, current, price) = self
            .items
            .iter()
            .enumerate()
            .find(|(_, item)| &item.id == id)
            .map(|(pos, item)| (pos, item.quantity, item.price))
            .ok_or_else(|| CartError::NotFound(id.clone()))?;
        let next = i64::from(current).saturating_add(delta);
        if next <= 0 {
            return Ok(QuantityChange::Removed(self.items.remove(pos)));
        }

        let quantity = u32::try_from(next).map_err(|_| CartError::InvalidInput {
            field: "quantity",
            reason: format!("quantity cannot exceed {}", u32::MAX),
        })?;
        if let Some(added) = quantity.checked_sub(current) {
            self.ensure_room(added, price)?;
        }
        if let Some(item) = self.items.get_mut(pos) {
            item.quantity = quantity;
        }
        Ok(QuantityChange::Updated {
            id: id.clone(),
            quantity,
        })
    }

    /// Remove an entry. Returns it if it was present.
    pub fn remove(&mut self, id: &LineItemId) -> Option<LineItem> {
        let pos = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Entries in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.checked_subtotal().unwrap_or(Decimal::MAX)
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.checked_item_count().unwrap_or(u32::MAX)
    }

    /// Subtotal, shipping, total and item count under `policy`.
    #[must_use]
    pub fn totals(&self, policy: &ShippingPolicy) -> Totals {
        Totals::new(self.subtotal(), self.item_count(), policy)
    }

    fn checked_subtotal(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(item.price.checked_times(item.quantity)?)
        })
    }

    fn checked_item_count(&self) -> Option<u32> {
        self.items
            .iter()
            .try_fold(0u32, |acc, item| acc.checked_add(item.quantity))
    }

    /// Check that `units` more of `price` keep the subtotal and unit count
    /// representable.
    fn ensure_room(&self, units: u32, price: Price) -> Result<(), CartError> {
        self.checked_item_count()
            .and_then(|count| count.checked_add(units))
            .ok_or_else(|| too_large("quantity"))?;
        price
            .checked_times(units)
            .and_then(|added| self.checked_subtotal()?.checked_add(added))
            .ok_or_else(|| too_large("price"))?;
        Ok(())
    }

    fn position_of_product(&self, name: &str, price: Price) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.name == name && item.price == price)
    }
}

fn too_large(field: &'static str) -> CartError {
    CartError::InvalidInput {
        field,
        reason: "cart total would exceed the maximum allowed".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn product(name: &str, price: &str) -> NewLineItem {
        NewLineItem::parse(name, price, "img/products/f1.jpg").unwrap()
    }

    #[test]
    fn test_distinct_adds_count_and_sum() {
        let mut cart = Cart::new();
        let prices = ["78", "19.99", "0", "120.50"];
        for (i, price) in prices.iter().enumerate() {
            cart.add(product(&format!("Item {i}"), price)).unwrap();
        }
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.len(), 4);
        assert_eq!(cart.subtotal(), Decimal::new(21849, 2));
    }

    #[test]
    fn test_same_product_twice_increments() {
        let mut cart = Cart::new();
        let first = cart.add(product("Shirt", "20.00")).unwrap();
        let second = cart.add(product("Shirt", "$20")).unwrap();

        assert!(matches!(first, AddOutcome::Inserted(_)));
        assert_eq!(
            second,
            AddOutcome::Incremented {
                id: first.id().clone(),
                quantity: 2
            }
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_same_name_different_price_is_separate() {
        let mut cart = Cart::new();
        cart.add(product("Shirt", "20")).unwrap();
        cart.add(product("Shirt", "25")).unwrap();
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = Cart::new();
        cart.add(product("B", "1")).unwrap();
        cart.add(product("A", "1")).unwrap();
        cart.add(product("B", "1")).unwrap();
        let names: Vec<_> = cart.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_adjust_by_negative_quantity_removes() {
        let mut cart = Cart::new();
        let id = cart.add(product("Shirt", "20")).unwrap().id().clone();
        cart.add(product("Shirt", "20")).unwrap();
        cart.add(product("Shoes", "85")).unwrap();

        let change = cart.adjust_quantity(&id, -2).unwrap();
        assert!(matches!(change, QuantityChange::Removed(ref item) if item.name == "Shirt"));
        assert!(cart.get(&id).is_none());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_adjust_below_zero_removes() {
        let mut cart = Cart::new();
        let id = cart.add(product("Shirt", "20")).unwrap().id().clone();
        assert!(matches!(
            cart.adjust_quantity(&id, -7).unwrap(),
            QuantityChange::Removed(_)
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_up() {
        let mut cart = Cart::new();
        let id = cart.add(product("Shirt", "20")).unwrap().id().clone();
        let change = cart.adjust_quantity(&id, 3).unwrap();
        assert_eq!(change, QuantityChange::Updated { id, quantity: 4 });
        assert_eq!(cart.subtotal(), Decimal::from(80));
    }

    #[test]
    fn test_adjust_unknown_id() {
        let mut cart = Cart::new();
        cart.add(product("Shirt", "20")).unwrap();
        let missing = LineItemId::from("missing");
        assert_eq!(
            cart.adjust_quantity(&missing, 1),
            Err(CartError::NotFound(missing))
        );
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_adjust_past_u32_is_rejected() {
        let mut cart = Cart::new();
        let id = cart.add(product("Shirt", "1")).unwrap().id().clone();
        assert!(matches!(
            cart.adjust_quantity(&id, 5_000_000_000),
            Err(CartError::InvalidInput { field: "quantity", .. })
        ));
        assert_eq!(cart.get(&id).unwrap().quantity, 1);
    }

    #[test]
    fn test_adjust_overflowing_subtotal_is_rejected() {
        let mut cart = Cart::new();
        let id = cart
            .add(product("Yacht", "50000000000000000000"))
            .unwrap()
            .id()
            .clone();
        assert!(matches!(
            cart.adjust_quantity(&id, 4_000_000_000),
            Err(CartError::InvalidInput { field: "price", .. })
        ));
        assert_eq!(cart.get(&id).unwrap().quantity, 1);
        assert_eq!(
            cart.subtotal(),
            Price::parse("50000000000000000000").unwrap().amount()
        );
    }

    #[test]
    fn test_add_overflowing_subtotal_is_rejected() {
        let mut cart = Cart::new();
        cart.add(product("Yacht", "50000000000000000000000000000")).unwrap();
        let before = cart.clone();
        assert!(matches!(
            cart.add(product("Yacht", "50000000000000000000000000000")),
            Err(CartError::InvalidInput { field: "price", .. })
        ));
        assert!(matches!(
            cart.add(product("Island", "50000000000000000000000000000")),
            Err(CartError::InvalidInput { field: "price", .. })
        ));
        assert_eq!(cart, before);
        assert_eq!(cart.totals(&ShippingPolicy::default()).total, cart.subtotal());
    }

    #[test]
    fn test_from_items_drops_overflowing_entries() {
        let item = |id: &str, name: &str, price: &str, quantity| LineItem {
            id: LineItemId::from(id),
            name: name.to_string(),
            price: Price::parse(price).unwrap(),
            image: String::new(),
            quantity,
        };
        let cart = Cart::from_items([
            item("1", "Shirt", "20", 1),
            item("2", "Yacht", "50000000000000000000", 4_000_000_000),
            item("3", "Hat", "5", u32::MAX),
        ]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.subtotal(), Decimal::from(20));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        let id = cart.add(product("Shirt", "20")).unwrap().id().clone();
        assert!(cart.remove(&LineItemId::from("nope")).is_none());
        assert_eq!(cart.remove(&id).map(|i| i.name), Some("Shirt".to_string()));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            NewLineItem::parse("  ", "20", ""),
            Err(CartError::InvalidInput { field: "name", .. })
        ));
        assert!(matches!(
            NewLineItem::parse("Shirt", "abc", ""),
            Err(CartError::InvalidInput { field: "price", .. })
        ));
        assert!(matches!(
            NewLineItem::parse("Shirt", "-3", ""),
            Err(CartError::InvalidInput { field: "price", .. })
        ));
    }

    #[test]
    fn test_scenario_totals() {
        let policy = ShippingPolicy::default();
        let mut cart = Cart::new();

        cart.add(product("Shirt", "20.00")).unwrap();
        let t = cart.totals(&policy);
        assert_eq!(
            (t.subtotal, t.shipping, t.total, t.item_count),
            (Decimal::from(20), Decimal::TEN, Decimal::from(30), 1)
        );

        cart.add(product("Shoes", "85.00")).unwrap();
        let t = cart.totals(&policy);
        assert_eq!(
            (t.subtotal, t.shipping, t.total, t.item_count),
            (Decimal::from(105), Decimal::ZERO, Decimal::from(105), 2)
        );

        cart.clear();
        let t = cart.totals(&policy);
        assert_eq!(
            (t.subtotal, t.shipping, t.total, t.item_count),
            (Decimal::ZERO, Decimal::TEN, Decimal::TEN, 0)
        );
    }

    #[test]
    fn test_subtotal_exactly_threshold_pays_shipping() {
        let mut cart = Cart::new();
        cart.add(product("Bag", "60")).unwrap();
        cart.add(product("Hat", "40")).unwrap();
        assert_eq!(cart.totals(&ShippingPolicy::default()).shipping, Decimal::TEN);
    }

    #[test]
    fn test_from_items_drops_zero_and_merges() {
        let item = |id: &str, name: &str, quantity| LineItem {
            id: LineItemId::from(id),
            name: name.to_string(),
            price: Price::parse("5").unwrap(),
            image: String::new(),
            quantity,
        };
        let cart = Cart::from_items([
            item("1", "A", 2),
            item("2", "B", 0),
            item("3", "A", 1),
        ]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id.as_str(), "1");
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_line_item_accepts_legacy_image_key() {
        let json = r#"{"id":"1700000000000","name":"Cartoon Astronaut T-Shirts","price":78,"imgSrc":"img/products/f1.jpg","quantity":1}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.image, "img/products/f1.jpg");
        assert_eq!(item.price.amount(), Decimal::from(78));
    }

    fn arb_products() -> impl Strategy<Value = Vec<(String, i64)>> {
        prop::collection::vec(("[A-Za-z][A-Za-z ]{0,11}", 0i64..10_000_000), 0..40)
    }

    proptest! {
        /// For any sequence of adds of distinct products, the unit count is
        /// the number of adds and the subtotal is the sum of their prices.
        #[test]
        fn prop_distinct_adds_count_and_sum(products in arb_products()) {
            let mut cart = Cart::new();
            let mut seen = HashSet::new();
            let mut expected = Decimal::ZERO;
            let mut adds = 0u32;

            for (name, cents) in products {
                let price = Decimal::new(cents, 2);
                if !seen.insert((name.trim().to_string(), price)) {
                    continue;
                }
                let outcome = cart
                    .add(NewLineItem::parse(&name, &format!("${price}"), "").unwrap())
                    .unwrap();
                prop_assert!(matches!(outcome, AddOutcome::Inserted(_)));
                expected += price;
                adds += 1;
            }

            prop_assert_eq!(cart.item_count(), adds);
            prop_assert_eq!(cart.len(), seen.len());
            prop_assert_eq!(cart.subtotal(), expected);
        }

        /// Adding the same product `n` times leaves one entry of quantity `n`.
        #[test]
        fn prop_repeated_add_merges(cents in 0i64..10_000_000, times in 1u32..50) {
            let price = Decimal::new(cents, 2);
            let mut cart = Cart::new();
            for _ in 0..times {
                cart.add(NewLineItem::parse("Shirt", &price.to_string(), "").unwrap())
                    .unwrap();
            }
            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(cart.items()[0].quantity, times);
            prop_assert_eq!(cart.subtotal(), price * Decimal::from(times));
        }
    }
}
