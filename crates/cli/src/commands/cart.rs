//! Persisted cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the saved cart
//! tienda cart show
//!
//! # Empty the saved cart
//! tienda cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `TIENDA_DATA_DIR` - Directory holding the cart snapshot (default: `data`)

use tienda_storefront::cart::{CartStorage, CartStore, FileStorage};
use tienda_storefront::config::StorefrontConfig;

use super::CommandError;

fn open_store() -> Result<CartStore<FileStorage>, CommandError> {
    let config = StorefrontConfig::from_env()?;
    let storage = FileStorage::new(config.data_dir);
    tracing::debug!(dir = %storage.dir().display(), "Opening cart storage");
    Ok(CartStore::open(storage))
}

/// Print every line of the saved cart with the totals.
pub fn show() -> Result<(), CommandError> {
    let store = open_store()?;
    let cart = store.cart();

    #[allow(clippy::print_stdout)]
    {
        if cart.is_empty() {
            println!("Cart is empty.");
            return Ok(());
        }

        for line in cart.lines() {
            println!(
                "{:>4}  {:>3} x {:<40} {:>10} {:>10}",
                line.id.as_i32(),
                line.quantity,
                line.title,
                line.price.display(),
                line.line_total().display()
            );
        }
        println!(
            "{} item(s), total {}",
            store.total_item_count(),
            store.total_price().display()
        );
    }

    Ok(())
}

/// Empty the saved cart.
pub fn clear() -> Result<(), CommandError> {
    let mut store = open_store()?;
    let removed = clear_cart(&mut store)?;

    tracing::info!(items = removed, "Cart cleared");
    Ok(())
}

/// Empty `store` and return how many items it held.
///
/// # Errors
///
/// Returns [`CommandError::Storage`] if the empty snapshot was not written.
fn clear_cart<S: CartStorage>(store: &mut CartStore<S>) -> Result<u64, CommandError> {
    let removed = store.total_item_count();
    store.clear();

    match store.take_write_error() {
        Some(e) => Err(e.into()),
        None => Ok(removed),
    }
}
