//! Core value types for Tote.
//!
//! This module provides type-safe wrappers for identifiers and prices.

pub mod id;
pub mod price;

pub use id::LineItemId;
pub use price::{Price, PriceError, format_money};
