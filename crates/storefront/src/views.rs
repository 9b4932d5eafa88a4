//! Askama views for the cart overlay.
//!
//! Every interactive element carries `data-action` (and `data-id` for item
//! rows). The host page binds a single listener on `#cart-overlay` and
//! forwards the pair to [`crate::widget::Action::from_element`], so nothing
//! needs rebinding after a re-render.

use askama::Template;
use tote_core::{LineItem, Totals, format_money};

use crate::checkout::Country;
use crate::tasks::{Notification, NotificationPhase};

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Build the view from the current items and their totals.
    #[must_use]
    pub fn new(items: &[LineItem], totals: &Totals) -> Self {
        Self {
            items: items.iter().map(CartItemView::from).collect(),
            subtotal: format_money(totals.subtotal),
            shipping: format_money(totals.shipping),
            total: format_money(totals.total),
            item_count: totals.item_count,
        }
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_price: format_money(item.line_total()),
        }
    }
}

/// Country option for the checkout select.
#[derive(Debug, Clone, Copy)]
pub struct CountryOption {
    pub code: &'static str,
    pub name: &'static str,
}

impl CountryOption {
    #[must_use]
    pub fn all() -> Vec<Self> {
        Country::ALL
            .into_iter()
            .map(|c| Self {
                code: c.code(),
                name: c.name(),
            })
            .collect()
    }
}

/// Which body the checkout panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPanel {
    Form,
    Processing,
    Success,
}

/// Full overlay: cart contents, summary, and checkout panel.
#[derive(Template)]
#[template(path = "cart/overlay.html")]
pub struct CartOverlayTemplate {
    pub cart: CartView,
    pub open: bool,
    pub checkout_shown: bool,
    pub processing: bool,
    pub order_placed: bool,
    pub countries: Vec<CountryOption>,
}

impl CartOverlayTemplate {
    #[must_use]
    pub fn new(cart: CartView, open: bool, checkout_shown: bool, panel: CheckoutPanel) -> Self {
        Self {
            cart,
            open,
            checkout_shown,
            processing: panel == CheckoutPanel::Processing,
            order_placed: panel == CheckoutPanel::Success,
            countries: CountryOption::all(),
        }
    }
}

/// Cart items fragment, re-rendered after every mutation.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart summary rows.
#[derive(Template)]
#[template(path = "partials/cart_summary.html")]
pub struct CartSummaryTemplate {
    pub cart: CartView,
}

/// Navbar cart count badge. Hidden when the cart is empty.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Notification banner.
#[derive(Template)]
#[template(path = "partials/notification.html")]
pub struct NotificationTemplate {
    pub message: String,
    pub fading: bool,
}

impl From<&Notification> for NotificationTemplate {
    fn from(n: &Notification) -> Self {
        Self {
            message: n.message.clone(),
            fading: n.phase == NotificationPhase::Fading,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tote_core::{Cart, NewLineItem, ShippingPolicy};

    fn sample_view() -> CartView {
        let mut cart = Cart::new();
        cart.add(NewLineItem::parse("Shirt", "20", "img/f1.jpg").unwrap()).unwrap();
        cart.add(NewLineItem::parse("Shirt", "20", "img/f1.jpg").unwrap()).unwrap();
        cart.add(NewLineItem::parse("Shoes <XL>", "85", "img/f2.jpg").unwrap()).unwrap();
        CartView::new(cart.items(), &cart.totals(&ShippingPolicy::default()))
    }

    #[test]
    fn test_view_formats_money() {
        let view = sample_view();
        assert_eq!(view.subtotal, "$125.00");
        assert_eq!(view.shipping, "$0.00");
        assert_eq!(view.total, "$125.00");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items[0].price, "$20.00");
        assert_eq!(view.items[0].line_price, "$40.00");
    }

    #[test]
    fn test_items_fragment_escapes_and_tags_actions() {
        let html = CartItemsTemplate {
            cart: sample_view(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Shoes &#60;XL&#62;") || html.contains("Shoes &lt;XL&gt;"));
        assert!(!html.contains("Shoes <XL>"));
        assert!(html.contains("data-action=\"increase\""));
        assert!(html.contains("data-action=\"decrease\""));
        assert!(html.contains("data-action=\"remove\""));
    }

    #[test]
    fn test_empty_fragment_offers_start_shopping() {
        let cart = Cart::new();
        let view = CartView::new(cart.items(), &cart.totals(&ShippingPolicy::default()));
        let html = CartItemsTemplate { cart: view }.render().unwrap();
        assert!(html.contains("Your cart is empty"));
        assert!(html.contains("data-action=\"start-shopping\""));
    }

    #[test]
    fn test_count_badge_hidden_when_zero() {
        let hidden = CartCountTemplate { count: 0 }.render().unwrap();
        let shown = CartCountTemplate { count: 4 }.render().unwrap();
        assert!(hidden.contains("hidden"));
        assert!(shown.contains('4'));
        assert!(!shown.contains("hidden"));
    }

    #[test]
    fn test_overlay_panels() {
        let closed = CartOverlayTemplate::new(sample_view(), false, false, CheckoutPanel::Form)
            .render()
            .unwrap();
        assert!(closed.contains("cart-closed"));
        assert!(closed.contains("Items (3)"));

        let processing =
            CartOverlayTemplate::new(sample_view(), true, true, CheckoutPanel::Processing)
                .render()
                .unwrap();
        assert!(processing.contains("cart-open"));
        assert!(processing.contains("Processing..."));
        assert!(processing.contains("disabled"));

        let placed = CartOverlayTemplate::new(sample_view(), true, true, CheckoutPanel::Success)
            .render()
            .unwrap();
        assert!(placed.contains("Thank You!"));
        assert!(placed.contains("data-action=\"continue-after-order\""));
    }

    #[test]
    fn test_notification_fade_class() {
        let html = NotificationTemplate {
            message: "Shirt added to cart!".to_string(),
            fading: true,
        }
        .render()
        .unwrap();
        assert!(html.contains("Shirt added to cart!"));
        assert!(!html.contains("show"));
    }
}
