//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TOTE_DATA_DIR` - Directory holding the persisted cart (default: `.tote`)
//! - `TOTE_STORAGE_KEY` - Persistence slot name; letters, digits, `_` and `-` (default: `cartItems`)
//! - `TOTE_FREE_SHIPPING_THRESHOLD` - Subtotals above this ship free (default: 100)
//! - `TOTE_SHIPPING_FEE` - Flat shipping fee otherwise (default: 10)
//! - `TOTE_NOTIFICATION_MS` - How long notifications stay visible (default: 3000)
//! - `TOTE_NOTIFICATION_FADE_MS` - Notification fade-out time (default: 300)
//! - `TOTE_ORDER_PROCESSING_MS` - Simulated order processing delay (default: 2000)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use tote_core::ShippingPolicy;

use crate::storage;
use crate::store::DEFAULT_STORAGE_KEY;
use crate::tasks::NotificationTiming;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Directory for the file-backed store
    pub data_dir: PathBuf,
    /// Slot holding the serialized cart
    pub storage_key: String,
    /// Shipping fee rules
    pub shipping: ShippingPolicy,
    /// Notification banner timing
    pub notification: NotificationTiming,
    /// Delay between submitting checkout and the order being placed
    pub order_processing: Duration,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".tote"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            shipping: ShippingPolicy::default(),
            notification: NotificationTiming::default(),
            order_processing: Duration::from_millis(2000),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or
    /// the storage key is not a valid slot name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("TOTE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let storage_key = lookup("TOTE_STORAGE_KEY").unwrap_or(defaults.storage_key);
        storage::validate_key(&storage_key)
            .map_err(|e| ConfigError::InvalidEnvVar("TOTE_STORAGE_KEY".to_string(), e.to_string()))?;

        let free_above: Decimal = parse_or(
            &lookup,
            "TOTE_FREE_SHIPPING_THRESHOLD",
            defaults.shipping.free_above,
        )?;
        let flat_fee: Decimal = parse_or(&lookup, "TOTE_SHIPPING_FEE", defaults.shipping.flat_fee)?;
        for (key, value) in [
            ("TOTE_FREE_SHIPPING_THRESHOLD", free_above),
            ("TOTE_SHIPPING_FEE", flat_fee),
        ] {
            if value < Decimal::ZERO {
                return Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "must not be negative".to_string(),
                ));
            }
        }

        let notification = NotificationTiming {
            visible: millis_or(&lookup, "TOTE_NOTIFICATION_MS", defaults.notification.visible)?,
            fade: millis_or(&lookup, "TOTE_NOTIFICATION_FADE_MS", defaults.notification.fade)?,
        };
        let order_processing =
            millis_or(&lookup, "TOTE_ORDER_PROCESSING_MS", defaults.order_processing)?;

        Ok(Self {
            data_dir,
            storage_key,
            shipping: ShippingPolicy::new(free_above, flat_fee),
            notification,
            order_processing,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use `default`.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a millisecond duration if set, otherwise use `default`.
fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(lookup, key, default_ms).map(Duration::from_millis)
}
