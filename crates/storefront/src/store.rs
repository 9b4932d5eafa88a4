//! Persistent cart store.
//!
//! `CartStore` wraps a [`Cart`] and a [`KeyValueStore`] slot. Every mutation
//! writes the full item list back to the slot before returning; totals are
//! derived on each call and never cached.
//!
//! # Stored format
//!
//! ```json
//! [{"id":"…","name":"Shirt","price":"20.00","image":"img/f1.jpg","quantity":1}]
//! ```
//!
//! Loading is forgiving: a missing slot, an unreadable backend, or malformed
//! JSON all yield an empty cart.

use rust_decimal::Decimal;
use tote_core::{
    AddOutcome, Cart, LineItem, LineItemId, NewLineItem, QuantityChange, ShippingPolicy, Totals,
};
use tracing::instrument;

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Slot name used by the legacy browser cart.
pub const DEFAULT_STORAGE_KEY: &str = "cartItems";

/// A cart bound to a persistence slot.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    policy: ShippingPolicy,
    cart: Cart,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Restore the cart stored under `key`, or start empty.
    ///
    /// Never fails; problems with stored data are logged and discarded.
    pub fn load(storage: S, key: impl Into<String>, policy: ShippingPolicy) -> Self {
        let key = key.into();
        let cart = read_cart(&storage, &key);
        tracing::debug!(key = %key, items = cart.len(), "Cart loaded");
        Self {
            storage,
            key,
            policy,
            cart,
        }
    }

    /// Discard in-memory state and re-read the slot.
    pub fn reload(&mut self) {
        self.cart = read_cart(&self.storage, &self.key);
    }

    /// Write the full item list to the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be encoded or the backend write
    /// fails.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.cart)?;
        self.storage.put(&self.key, &json)?;
        Ok(())
    }

    /// Add one unit of a product, merging with an entry of the same name and
    /// price.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty name, a negative or non-numeric
    /// price, or a unit the cart cannot hold without overflowing its totals
    /// (the cart is unchanged), or a storage error if saving fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn add_item(&mut self, name: &str, price: &str, image: &str) -> Result<AddOutcome> {
        let new = NewLineItem::parse(name, price, image)?;
        let outcome = self.cart.add(new)?;
        self.save()?;
        Ok(outcome)
    }

    /// Change an entry's quantity by `delta`, removing it if the result is
    /// zero or below.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is not in the cart, or `InvalidInput` if
    /// the new quantity would overflow (nothing is written in either case),
    /// or a storage error if saving fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn set_quantity(&mut self, id: &LineItemId, delta: i64) -> Result<QuantityChange> {
        let change = self.cart.adjust_quantity(id, delta)?;
        self.save()?;
        Ok(change)
    }

    /// Remove an entry if present.
    ///
    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn remove_item(&mut self, id: &LineItemId) -> Result<Option<LineItem>> {
        let removed = self.cart.remove(id);
        self.save()?;
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn clear(&mut self) -> Result<()> {
        self.cart.clear();
        self.save()
    }

    /// Consume the store and hand back its backend.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S> CartStore<S> {
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.cart.get(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    #[must_use]
    pub fn shipping(&self) -> Decimal {
        self.policy.fee_for(self.subtotal())
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal() + self.shipping()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// All derived figures at once.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.cart.totals(&self.policy)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

fn read_cart<S: KeyValueStore>(storage: &S, key: &str) -> Cart {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Option<Vec<LineItem>>>(&raw) {
        Ok(items) => {
            let items = items.unwrap_or_default();
            let stored_units: u64 = items.iter().map(|item| u64::from(item.quantity)).sum();
            let cart = Cart::from_items(items);
            if u64::from(cart.item_count()) != stored_units {
                tracing::warn!(key, "Dropped stored entries exceeding cart limits");
            }
            cart
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored cart is malformed, starting empty");
            Cart::new()
        }
    }
}
