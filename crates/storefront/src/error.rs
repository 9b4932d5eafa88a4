//! Unified error handling for the widget.
//!
//! Provides a unified `WidgetError` type. Internal failures are logged when
//! reported and shown to the shopper only as a generic message.

use thiserror::Error;
use tote_core::CartError;

use crate::checkout::CheckoutError;
use crate::storage::StorageError;

/// Widget-level error type.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// A cart mutation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The persistence backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A view failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Checkout was refused.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// An element carried an action the widget does not understand.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl WidgetError {
    /// Whether this error comes from the widget itself rather than from
    /// shopper input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Serialization(_) | Self::Render(_)
        )
    }

    /// Message suitable for the notification banner.
    ///
    /// Internal details are never shown to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Cart(CartError::InvalidInput { reason, .. }) => {
                format!("Could not add item: {reason}")
            }
            Self::Cart(CartError::NotFound(_)) => "That item is no longer in your cart".to_string(),
            Self::Storage(_) | Self::Serialization(_) => {
                "Your cart could not be saved".to_string()
            }
            Self::Render(_) => "Something went wrong".to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::UnknownAction(_) => "Unsupported action".to_string(),
        }
    }

    /// Log the error at a level matching its origin.
    pub fn report(&self) {
        if self.is_internal() {
            tracing::error!(error = %self, "Widget error");
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }
    }
}

/// Result type alias for `WidgetError`.
pub type Result<T> = std::result::Result<T, WidgetError>;
