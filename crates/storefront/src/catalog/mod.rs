//! Product catalog.
//!
//! The catalog is fetched once from the product API by [`CatalogClient`] and
//! held by [`CatalogStore`]. Categories are not taken from the API: each
//! product is assigned one of [`Category::ALL`] at load time by a
//! [`CategoryAssigner`].

mod client;

pub use client::{CatalogClient, CatalogError, ProductRecord};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tienda_core::{Category, CategoryFilter, Price, ProductId};

/// A purchasable product with its assigned category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub category: Category,
}

// =============================================================================
// Category assignment
// =============================================================================

/// Chooses a category for each product as the catalog is loaded.
pub trait CategoryAssigner {
    fn assign(&mut self, record: &ProductRecord) -> Category;
}

/// Uniform random draw from the fixed category set.
#[derive(Debug, Clone)]
pub struct RandomCategories {
    rng: StdRng,
}

impl RandomCategories {
    /// Seeded from the operating system; assignments differ between loads.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible assignments for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CategoryAssigner for RandomCategories {
    fn assign(&mut self, _record: &ProductRecord) -> Category {
        let index = self.rng.random_range(0..Category::ALL.len());
        Category::ALL.get(index).copied().unwrap_or(Category::Ropa)
    }
}

/// Deterministic assignment from the product id (`id mod 3`).
///
/// Stable across reloads, so a product keeps its category for the lifetime of
/// the catalog endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoriesById;

impl CategoryAssigner for CategoriesById {
    fn assign(&mut self, record: &ProductRecord) -> Category {
        let len = i32::try_from(Category::ALL.len()).unwrap_or(1);
        let index = usize::try_from(record.id.as_i32().rem_euclid(len)).unwrap_or(0);
        Category::ALL.get(index).copied().unwrap_or(Category::Ropa)
    }
}

// =============================================================================
// CatalogStore
// =============================================================================

/// Holds the loaded products and serves category-filtered views.
pub struct CatalogStore {
    products: Vec<Product>,
    assigner: Box<dyn CategoryAssigner + Send + Sync>,
    loaded: bool,
    failure: Option<String>,
}

impl CatalogStore {
    /// Create an empty store that assigns categories with `assigner`.
    #[must_use]
    pub fn new(assigner: impl CategoryAssigner + Send + Sync + 'static) -> Self {
        Self {
            products: Vec::new(),
            assigner: Box::new(assigner),
            loaded: false,
            failure: None,
        }
    }

    /// Replace the held products, assigning each a category.
    ///
    /// Records with a negative price are skipped. Clears any recorded failure.
    pub fn load(&mut self, records: impl IntoIterator<Item = ProductRecord>) {
        let mut products = Vec::new();
        for record in records {
            if record.price.is_negative() {
                tracing::warn!(product_id = %record.id, price = %record.price, "Skipping product with negative price");
                continue;
            }
            let category = self.assigner.assign(&record);
            products.push(Product {
                id: record.id,
                title: record.title,
                price: record.price,
                image: record.image,
                category,
            });
        }

        tracing::info!(products = products.len(), "Catalog loaded");
        self.products = products;
        self.loaded = true;
        self.failure = None;
    }

    /// Record a failed fetch. Previously loaded products are kept.
    pub fn mark_failed(&mut self, error: &CatalogError) {
        self.failure = Some(error.to_string());
    }

    /// The products passing `filter`, in load order.
    #[must_use]
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product.category))
            .collect()
    }

    /// All products in load order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The product with `id`, if loaded.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether a load has completed at least once.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Message of the most recent failed fetch, if it has not been superseded
    /// by a successful load.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(RandomCategories::from_os_rng())
    }
}
