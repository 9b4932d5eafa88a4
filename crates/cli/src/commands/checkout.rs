//! Checkout command.
//!
//! No payment is taken: the form is validated, the order "processes" for
//! `TOTE_ORDER_PROCESSING_MS`, and the cart is cleared.

#![allow(clippy::print_stdout)]

use clap::Args;
use tote_core::format_money;
use tote_storefront::checkout::CheckoutForm;
use tote_storefront::storage::FileStore;
use tote_storefront::{Widget, WidgetError};

/// Shipping and payment details.
#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    postal_code: String,
    /// One of `us`, `ca`, `uk`, `au`, `pk`
    #[arg(long)]
    country: String,
    #[arg(long)]
    card_name: String,
    #[arg(long)]
    card_number: String,
    /// MM/YY
    #[arg(long)]
    expiry: String,
    #[arg(long)]
    cvv: String,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
            card_name: args.card_name,
            card_number: args.card_number,
            expiry: args.expiry,
            cvv: args.cvv,
        }
    }
}

/// Place an order and print the confirmation.
///
/// # Errors
///
/// Returns an error if the form is incomplete, the cart is empty, or the
/// cleared cart cannot be saved.
pub async fn place(widget: &mut Widget<FileStore>, args: CheckoutArgs) -> Result<(), WidgetError> {
    let form = CheckoutForm::from(args);
    println!("Processing...");
    let confirmation = match widget.place_order(&form).await {
        Ok(confirmation) => confirmation,
        Err(e) => {
            println!("{}", e.user_message());
            return Err(e);
        }
    };

    println!("Thank You!");
    println!("Your order has been placed successfully.");
    println!(
        "{} item(s), {} total. Confirmation sent to {}.",
        confirmation.item_count,
        format_money(confirmation.total),
        confirmation.email
    );
    Ok(())
}
