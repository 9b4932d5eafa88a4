//! Tote Core - cart domain types.
//!
//! This crate provides the pure cart model used by every Tote component:
//! - `storefront` - persistent cart store, views, and the widget controller
//! - `cli` - command-line driver for the widget
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no timers. Persistence lives in `tote-storefront`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices
//! - [`cart`] - Line items, the ordered cart list, and derived totals
//! - [`shipping`] - Flat-fee shipping with a free-shipping threshold

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod shipping;
pub mod types;

pub use cart::{AddOutcome, Cart, CartError, LineItem, NewLineItem, QuantityChange};
pub use shipping::{ShippingPolicy, Totals};
pub use types::*;
