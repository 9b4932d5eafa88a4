//! Integration tests for Tote.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tote-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - file-backed persistence and the cart invariants
//! - `widget_flow` - overlay gestures through to checkout
//!
//! Helpers shared by the test files live here.

use std::path::Path;

use tote_storefront::WidgetConfig;
use tote_storefront::storage::FileStore;

/// Open a file store in `dir`, panicking on failure.
///
/// # Panics
///
/// Panics if the directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn file_store(dir: &Path) -> FileStore {
    FileStore::open(dir).expect("failed to open file store")
}

/// Default configuration pointed at `dir`.
#[must_use]
pub fn config_in(dir: &Path) -> WidgetConfig {
    WidgetConfig {
        data_dir: dir.to_path_buf(),
        ..WidgetConfig::default()
    }
}
