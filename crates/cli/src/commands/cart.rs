//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! tote add -n Shirt -p '$20'
//! tote list
//! tote adjust <ID> -- -2
//! tote click remove --id <ID>
//! ```

#![allow(clippy::print_stdout)]

use tote_core::{LineItemId, format_money};
use tote_storefront::storage::FileStore;
use tote_storefront::{Action, ProductCard, Widget, WidgetError};

type Result<T> = std::result::Result<T, WidgetError>;

/// Add one unit of a product and print the notification.
pub fn add(widget: &mut Widget<FileStore>, name: String, price: String, image: String) -> Result<()> {
    let card = ProductCard {
        name,
        price_text: price,
        image,
    };
    let outcome = widget.add_product(&card)?;
    if let Some(notification) = widget.notification() {
        println!("{}", notification.message);
    }
    println!("{}", outcome.id());
    Ok(())
}

/// Change an item's quantity. Unknown ids are ignored with a warning.
pub fn adjust(widget: &mut Widget<FileStore>, id: &str, delta: i64) -> Result<()> {
    widget.adjust_quantity(&LineItemId::from(id), delta)?;
    totals(widget);
    Ok(())
}

pub fn remove(widget: &mut Widget<FileStore>, id: &str) -> Result<()> {
    widget.dispatch(Action::Remove(LineItemId::from(id)))?;
    totals(widget);
    Ok(())
}

pub fn clear(widget: &mut Widget<FileStore>) -> Result<()> {
    widget.clear_cart()?;
    totals(widget);
    Ok(())
}

/// Print one line per item, then the totals.
pub fn list(widget: &Widget<FileStore>) {
    let items = widget.store().items();
    if items.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in items {
        println!(
            "{}  {} x{}  {} each  {}",
            item.id,
            item.name,
            item.quantity,
            item.price,
            format_money(item.line_total())
        );
    }
    totals(widget);
}

pub fn totals(widget: &Widget<FileStore>) {
    let totals = widget.store().totals();
    println!("Items:    {}", totals.item_count);
    println!("Subtotal: {}", format_money(totals.subtotal));
    println!("Shipping: {}", format_money(totals.shipping));
    println!("Total:    {}", format_money(totals.total));
}

/// Print the overlay HTML and the count badge.
pub fn render(widget: &mut Widget<FileStore>, open: bool, checkout: bool) -> Result<()> {
    if open || checkout {
        widget.dispatch(Action::Toggle)?;
    }
    if checkout {
        widget.dispatch(Action::ShowCheckout)?;
    }
    println!("{}", widget.render_count()?);
    println!("{}", widget.render()?);
    if let Some(html) = widget.render_notification()? {
        println!("{html}");
    }
    Ok(())
}

/// Dispatch an overlay action by name, as the page's delegated listener would.
pub fn click(widget: &mut Widget<FileStore>, action: &str, id: Option<&str>) -> Result<()> {
    let action = Action::from_element(action, id)?;
    widget.dispatch(action)?;
    if let Some(notification) = widget.notification() {
        println!("{}", notification.message);
    }
    totals(widget);
    Ok(())
}
