//! Shopping cart state and persistence.
//!
//! [`CartStore`] is the only place cart lines are mutated. Every mutating
//! command writes the full snapshot to its [`CartStorage`] before returning,
//! so the stored snapshot and the in-memory cart never diverge on success.
//! The write is synchronous: callers holding the store behind an async lock
//! block for the duration of one small file write.
//!
//! # Invariants
//!
//! - At most one line per product id, in first-add order.
//! - Every line has `quantity >= 1`; a change that would take a line to zero
//!   or below removes it.
//!
//! # Example
//!
//! ```rust
//! use tienda_core::{Category, Price, ProductId};
//! use tienda_storefront::cart::{CartStore, MemoryStorage};
//! use tienda_storefront::catalog::Product;
//!
//! let product = Product {
//!     id: ProductId::new(1),
//!     title: "Backpack".to_string(),
//!     price: Price::from_cents(999),
//!     image: "https://example.com/1.jpg".to_string(),
//!     category: Category::Accesorios,
//! };
//!
//! let mut store = CartStore::open(MemoryStorage::new());
//! store.add_item(&product);
//! store.add_item(&product);
//! assert_eq!(store.total_item_count(), 2);
//! assert_eq!(store.total_price().display(), "$19.98");
//! ```

mod storage;

pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

use serde::{Deserialize, Serialize};
use tienda_core::{Price, ProductId};

use crate::catalog::Product;

/// Storage key holding the cart snapshot.
pub const CART_KEY: &str = "cart";

/// One product's entry in the cart.
///
/// Title, price and image are copied from the product when it is first added
/// and are not refreshed from later catalog loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Unit price times quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// An ordered sequence of cart lines.
///
/// Serializes as a plain JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// The lines in first-add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of all line totals, rounded to cents.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .sum::<Price>()
            .rounded()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    /// Restore the invariants on a snapshot read from storage.
    ///
    /// Zero-quantity lines are dropped and repeated ids are merged into the
    /// first occurrence. Returns whether anything changed.
    fn normalize(&mut self) -> bool {
        let before = self.lines.len();
        let mut merged: Vec<CartLine> = Vec::with_capacity(before);
        let mut changed = false;

        for line in self.lines.drain(..) {
            if line.quantity == 0 {
                changed = true;
                continue;
            }
            if let Some(existing) = merged.iter_mut().find(|l| l.id == line.id) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                changed = true;
            } else {
                merged.push(line);
            }
        }

        self.lines = merged;
        changed
    }
}

/// Owner of the cart and its persistence.
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    key: String,
    write_error: Option<StorageError>,
}

impl<S: CartStorage> CartStore<S> {
    /// Restore the cart stored under [`CART_KEY`], or start empty.
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, CART_KEY)
    }

    /// Restore the cart stored under `key`, or start empty.
    ///
    /// An unreadable or unparsable snapshot is logged and replaced by an empty
    /// cart on the next write.
    pub fn open_with_key(storage: S, key: &str) -> Self {
        let cart = match storage.read(key) {
            Ok(Some(snapshot)) => match serde_json::from_str::<Cart>(&snapshot) {
                Ok(mut cart) => {
                    if cart.normalize() {
                        tracing::warn!(key, "Stored cart had invalid lines; normalized");
                    }
                    cart
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "Stored cart is not valid JSON; starting empty");
                    Cart::default()
                }
            },
            Ok(None) => Cart::default(),
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to read stored cart; starting empty");
                Cart::default()
            }
        };

        tracing::debug!(key, lines = cart.len(), "Cart restored");

        Self {
            cart,
            storage,
            key: key.to_owned(),
            write_error: None,
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Take the error from the most recent write, if it failed.
    ///
    /// A later successful write clears it.
    pub const fn take_write_error(&mut self) -> Option<StorageError> {
        self.write_error.take()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1.
    pub fn add_item(&mut self, product: &Product) -> &Cart {
        if let Some(line) = self.cart.lines.iter_mut().find(|l| l.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            tracing::debug!(product_id = %product.id, quantity = line.quantity, "Cart line incremented");
        } else {
            self.cart.lines.push(CartLine::from_product(product));
            tracing::debug!(product_id = %product.id, "Cart line added");
        }

        self.persist();
        &self.cart
    }

    /// Add `delta` to the quantity of the line for `id`.
    ///
    /// Unknown ids leave the cart untouched and nothing is written. A result of
    /// zero or below removes the line.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) -> &Cart {
        let Some(index) = self.cart.position(id) else {
            return &self.cart;
        };

        let quantity = self
            .cart
            .lines
            .get(index)
            .map_or(0, |line| i64::from(line.quantity))
            .saturating_add(delta);

        if quantity <= 0 {
            self.cart.lines.remove(index);
            tracing::debug!(product_id = %id, "Cart line removed by quantity change");
        } else if let Some(line) = self.cart.lines.get_mut(index) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            tracing::debug!(product_id = %id, quantity = line.quantity, "Cart line quantity changed");
        }

        self.persist();
        &self.cart
    }

    /// Remove the line for `id`, if present.
    pub fn remove_item(&mut self, id: ProductId) -> &Cart {
        if let Some(index) = self.cart.position(id) {
            self.cart.lines.remove(index);
            tracing::debug!(product_id = %id, "Cart line removed");
        }

        self.persist();
        &self.cart
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> &Cart {
        self.cart.lines.clear();
        tracing::debug!("Cart cleared");

        self.persist();
        &self.cart
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of price times quantity over all lines, rounded to cents.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart.total()
    }

    /// Write the snapshot. Failures are logged and kept for
    /// [`take_write_error`](Self::take_write_error); the in-memory cart is kept.
    fn persist(&mut self) {
        let result = serde_json::to_string(&self.cart)
            .map_err(StorageError::from)
            .and_then(|snapshot| self.storage.write(&self.key, &snapshot));

        self.write_error = match result {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to persist cart");
                Some(e)
            }
        };
    }
}
