//! Tote Storefront library.
//!
//! The cart widget: a persistent [`store::CartStore`] plus the presentation
//! layer around it (overlay views, checkout, notifications).
//!
//! # Architecture
//!
//! - [`storage`] - key-value backends (file, memory)
//! - [`store`] - cart bound to a persistence slot; saves after every mutation
//! - [`widget`] - overlay state and event dispatch
//! - [`views`] - Askama templates for the overlay
//! - [`checkout`] - checkout form validation (no payment is taken)
//! - [`tasks`] - cancellable scheduled tasks for timed UI feedback

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod tasks;
pub mod views;
pub mod widget;

pub use config::WidgetConfig;
pub use error::{Result, WidgetError};
pub use store::CartStore;
pub use widget::{Action, ProductCard, Widget};
