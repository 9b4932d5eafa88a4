//! CLI command implementations.

use tote_storefront::storage::FileStore;
use tote_storefront::{Widget, WidgetConfig};

pub mod cart;
pub mod checkout;

/// Load configuration and open the widget over the file-backed store.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the data directory cannot
/// be created.
pub fn open_widget() -> Result<Widget<FileStore>, Box<dyn std::error::Error>> {
    let config = WidgetConfig::from_env()?;
    let storage = FileStore::open(&config.data_dir)?;
    tracing::debug!(dir = %config.data_dir.display(), key = %config.storage_key, "Opening cart");
    Ok(Widget::new(storage, &config))
}
