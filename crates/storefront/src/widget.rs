//! Widget controller.
//!
//! Owns the cart store, the overlay flags, and the notification banner, and
//! turns shopper gestures into store operations. The host binds one listener
//! to the overlay container; each click is forwarded as the element's
//! `data-action` / `data-id` pair.

use std::time::Duration;

use askama::Template;
use chrono::Utc;
use tote_core::{AddOutcome, CartError, LineItemId, QuantityChange};
use tracing::instrument;

use crate::checkout::{CheckoutDetails, CheckoutError, CheckoutForm, OrderConfirmation};
use crate::config::WidgetConfig;
use crate::error::{Result, WidgetError};
use crate::storage::KeyValueStore;
use crate::store::CartStore;
use crate::tasks::{Notification, Notifier};
use crate::views::{
    CartCountTemplate, CartOverlayTemplate, CartView, CheckoutPanel, NotificationTemplate,
};

/// A gesture forwarded from the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Navbar cart icon.
    Toggle,
    /// The close button in the cart header.
    Close,
    ContinueShopping,
    /// Shown in place of the item list when the cart is empty.
    StartShopping,
    /// Shown on the order success panel.
    ContinueAfterOrder,
    Increase(LineItemId),
    Decrease(LineItemId),
    Remove(LineItemId),
    ShowCheckout,
    BackToCart,
}

impl Action {
    /// Map an element's `data-action` and `data-id` attributes to an action.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::UnknownAction`] for an unrecognised action name
    /// or an item action without an id.
    pub fn from_element(action: &str, id: Option<&str>) -> Result<Self> {
        let item_id = || {
            id.filter(|id| !id.is_empty())
                .map(LineItemId::from)
                .ok_or_else(|| WidgetError::UnknownAction(format!("{action} requires data-id")))
        };

        Ok(match action {
            "toggle" => Self::Toggle,
            "close" => Self::Close,
            "continue-shopping" => Self::ContinueShopping,
            "start-shopping" => Self::StartShopping,
            "continue-after-order" => Self::ContinueAfterOrder,
            "increase" => Self::Increase(item_id()?),
            "decrease" => Self::Decrease(item_id()?),
            "remove" => Self::Remove(item_id()?),
            "show-checkout" => Self::ShowCheckout,
            "back-to-cart" => Self::BackToCart,
            other => return Err(WidgetError::UnknownAction(other.to_string())),
        })
    }
}

/// Product details as read from a product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub name: String,
    /// Price text as displayed, e.g. `$78`.
    pub price_text: String,
    pub image: String,
}

/// Overlay visibility flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    pub open: bool,
    pub checkout_shown: bool,
}

/// Where the checkout flow stands.
#[derive(Debug, Clone, Default)]
pub enum CheckoutState {
    #[default]
    Editing,
    /// Submitted; the submit button is disabled until the order completes.
    Processing(Box<CheckoutDetails>),
    Placed(OrderConfirmation),
}

/// The cart widget.
#[derive(Debug)]
pub struct Widget<S> {
    store: CartStore<S>,
    panel: PanelState,
    checkout: CheckoutState,
    notifier: Notifier,
    processing_delay: Duration,
}

impl<S: KeyValueStore> Widget<S> {
    /// Load the cart from `storage` and start with the overlay closed.
    pub fn new(storage: S, config: &WidgetConfig) -> Self {
        let store = CartStore::load(storage, config.storage_key.clone(), config.shipping);
        Self {
            store,
            panel: PanelState::default(),
            checkout: CheckoutState::default(),
            notifier: Notifier::new(config.notification),
            processing_delay: config.order_processing,
        }
    }

    /// Add one unit of the product on `card` and announce it.
    ///
    /// # Errors
    ///
    /// Returns the store error after showing its user-facing message.
    #[instrument(skip(self))]
    pub fn add_product(&mut self, card: &ProductCard) -> Result<AddOutcome> {
        match self
            .store
            .add_item(&card.name, &card.price_text, &card.image)
        {
            Ok(outcome) => {
                self.notifier
                    .show(format!("{} added to cart!", card.name.trim()));
                Ok(outcome)
            }
            Err(e) => {
                e.report();
                self.notifier.show(e.user_message());
                Err(e)
            }
        }
    }

    /// Apply an overlay gesture.
    ///
    /// Quantity changes for items that have since disappeared are logged and
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a mutation could not be saved.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Toggle => self.toggle(),
            Action::Close
            | Action::ContinueShopping
            | Action::StartShopping
            | Action::ContinueAfterOrder => self.close(),
            Action::Increase(id) => self.adjust_quantity(&id, 1)?,
            Action::Decrease(id) => self.adjust_quantity(&id, -1)?,
            Action::Remove(id) => {
                self.store.remove_item(&id)?;
            }
            Action::ShowCheckout => self.show_checkout(),
            Action::BackToCart => self.panel.checkout_shown = false,
        }
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the empty cart could not be saved.
    pub fn clear_cart(&mut self) -> Result<()> {
        self.store.clear()
    }

    /// Validate the form and start processing the order.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyProcessing` if an order is in flight, a validation
    /// error for an incomplete form, or `EmptyCart`.
    #[instrument(skip(self, form))]
    pub fn submit_order(&mut self, form: &CheckoutForm) -> Result<()> {
        if matches!(self.checkout, CheckoutState::Processing(_)) {
            return Err(CheckoutError::AlreadyProcessing.into());
        }
        let details = form.validate()?;
        if self.store.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }

        tracing::info!(
            items = self.store.item_count(),
            total = %self.store.total(),
            "Processing order"
        );
        self.checkout = CheckoutState::Processing(Box::new(details));
        Ok(())
    }

    /// Wait out the processing delay, then clear the cart and show the
    /// success panel.
    ///
    /// # Errors
    ///
    /// Returns an error if no order was submitted or the cleared cart could
    /// not be saved. In the latter case the order is not placed: the cart is
    /// re-read from storage and the form is editable again.
    pub async fn complete_order(&mut self) -> Result<OrderConfirmation> {
        let CheckoutState::Processing(details) = &self.checkout else {
            return Err(CheckoutError::NotSubmitted.into());
        };
        let email = details.email.clone();

        tokio::time::sleep(self.processing_delay).await;

        let confirmation = OrderConfirmation {
            placed_at: Utc::now(),
            email,
            item_count: self.store.item_count(),
            total: self.store.total(),
        };
        if let Err(e) = self.store.clear() {
            e.report();
            self.store.reload();
            self.checkout = CheckoutState::Editing;
            return Err(e);
        }
        self.checkout = CheckoutState::Placed(confirmation.clone());
        tracing::info!(
            item_count = confirmation.item_count,
            total = %confirmation.total,
            "Order placed"
        );
        Ok(confirmation)
    }

    /// Submit and complete an order in one step.
    ///
    /// # Errors
    ///
    /// See [`Self::submit_order`] and [`Self::complete_order`].
    pub async fn place_order(&mut self, form: &CheckoutForm) -> Result<OrderConfirmation> {
        self.submit_order(form)?;
        self.complete_order().await
    }

    /// Change an item's quantity by `delta`.
    ///
    /// Unknown ids are logged and ignored, as the item may have been removed
    /// since the overlay was rendered.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the change could not be saved.
    pub fn adjust_quantity(&mut self, id: &LineItemId, delta: i64) -> Result<()> {
        match self.store.set_quantity(id, delta) {
            Ok(QuantityChange::Removed(item)) => {
                tracing::debug!(id = %item.id, "Item removed at zero quantity");
                Ok(())
            }
            Ok(QuantityChange::Updated { .. }) => Ok(()),
            Err(WidgetError::Cart(CartError::NotFound(id))) => {
                tracing::warn!(%id, "Quantity change for unknown item ignored");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl<S> Widget<S> {
    fn toggle(&mut self) {
        if self.panel.open {
            self.close();
        } else {
            self.panel.open = true;
        }
    }

    fn close(&mut self) {
        self.panel.open = false;
        self.panel.checkout_shown = false;
        if matches!(self.checkout, CheckoutState::Placed(_)) {
            self.checkout = CheckoutState::Editing;
        }
    }

    fn show_checkout(&mut self) {
        if self.store.is_empty() {
            self.notifier.show(CheckoutError::EmptyCart.to_string());
            return;
        }
        self.panel.checkout_shown = true;
    }

    /// Render the whole overlay.
    ///
    /// # Errors
    ///
    /// Returns a render error if the template fails.
    pub fn render(&self) -> Result<String> {
        let panel = match self.checkout {
            CheckoutState::Editing => CheckoutPanel::Form,
            CheckoutState::Processing(_) => CheckoutPanel::Processing,
            CheckoutState::Placed(_) => CheckoutPanel::Success,
        };
        let template = CartOverlayTemplate::new(
            self.cart_view(),
            self.panel.open,
            self.panel.checkout_shown,
            panel,
        );
        Ok(template.render()?)
    }

    /// Render the navbar count badge.
    ///
    /// # Errors
    ///
    /// Returns a render error if the template fails.
    pub fn render_count(&self) -> Result<String> {
        Ok(CartCountTemplate {
            count: self.store.item_count(),
        }
        .render()?)
    }

    /// Render the notification banner, if one is showing.
    ///
    /// # Errors
    ///
    /// Returns a render error if the template fails.
    pub fn render_notification(&self) -> Result<Option<String>> {
        self.notifier
            .current()
            .map(|n| NotificationTemplate::from(&n).render())
            .transpose()
            .map_err(WidgetError::from)
    }

    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::new(self.store.items(), &self.store.totals())
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    #[must_use]
    pub const fn panel(&self) -> PanelState {
        self.panel
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutState {
        &self.checkout
    }

    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    /// Tear down the widget, cancelling any pending notification, and
    /// return the cart store.
    pub fn into_store(self) -> CartStore<S> {
        self.store
    }
}
