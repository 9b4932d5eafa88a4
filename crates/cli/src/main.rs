//! Tote CLI - drive the cart widget from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add a product as shown on its card
//! tote add -n "Cartoon Astronaut T-Shirts" -p '$78' -i img/products/f1.jpg
//!
//! # Change quantities and remove items
//! tote increase <ID>
//! tote decrease <ID>
//! tote adjust <ID> -- -3
//! tote remove <ID>
//!
//! # Inspect the cart
//! tote list
//! tote totals
//! tote render --open
//!
//! # Forward an overlay click
//! tote click show-checkout
//!
//! # Place an order (clears the cart)
//! tote checkout --first-name Ada --last-name Lovelace --email ada@example.com ...
//! ```
//!
//! # Commands
//!
//! - `add`, `increase`, `decrease`, `adjust`, `remove`, `clear` - mutate the cart
//! - `list`, `totals`, `render` - show the cart
//! - `click` - dispatch an overlay `data-action`
//! - `checkout` - simulate placing an order
//!
//! Configuration comes from `TOTE_*` environment variables (see
//! `tote_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::checkout::CheckoutArgs;

#[derive(Parser)]
#[command(name = "tote")]
#[command(author, version, about = "Tote shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Price as shown on the product card (e.g. `$78`)
        #[arg(short, long)]
        price: String,

        /// Product image URI
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Increase an item's quantity by one
    Increase {
        /// Line item ID
        id: String,
    },
    /// Decrease an item's quantity by one, removing it at zero
    Decrease {
        /// Line item ID
        id: String,
    },
    /// Change an item's quantity by any amount
    Adjust {
        /// Line item ID
        id: String,

        /// Amount to add (negative to subtract)
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove an item
    Remove {
        /// Line item ID
        id: String,
    },
    /// Empty the cart
    Clear,
    /// List cart items
    List,
    /// Show subtotal, shipping, total and item count
    Totals,
    /// Render the cart overlay as HTML
    Render {
        /// Render with the overlay open
        #[arg(long)]
        open: bool,

        /// Render with the checkout form shown
        #[arg(long)]
        checkout: bool,
    },
    /// Dispatch an overlay action by its `data-action` name
    Click {
        /// Action name (e.g. `increase`, `show-checkout`)
        action: String,

        /// Line item ID for item actions
        #[arg(long)]
        id: Option<String>,
    },
    /// Place an order and clear the cart
    Checkout(CheckoutArgs),
}

#[tokio::main]
async fn main() {
    // Initialize tracing, writing to stderr so stdout carries command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tote_cli=info,tote_storefront=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut widget = commands::open_widget()?;

    match cli.command {
        Commands::Add { name, price, image } => {
            commands::cart::add(&mut widget, name, price, image)?;
        }
        Commands::Increase { id } => commands::cart::adjust(&mut widget, &id, 1)?,
        Commands::Decrease { id } => commands::cart::adjust(&mut widget, &id, -1)?,
        Commands::Adjust { id, delta } => commands::cart::adjust(&mut widget, &id, delta)?,
        Commands::Remove { id } => commands::cart::remove(&mut widget, &id)?,
        Commands::Clear => commands::cart::clear(&mut widget)?,
        Commands::List => commands::cart::list(&widget),
        Commands::Totals => commands::cart::totals(&widget),
        Commands::Render { open, checkout } => {
            commands::cart::render(&mut widget, open, checkout)?;
        }
        Commands::Click { action, id } => {
            commands::cart::click(&mut widget, &action, id.as_deref())?;
        }
        Commands::Checkout(args) => commands::checkout::place(&mut widget, args).await?,
    }
    Ok(())
}
