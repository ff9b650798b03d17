//! Remote catalog commands.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! tienda catalog list
//!
//! # List one category
//! tienda catalog list --category ofertas
//! ```
//!
//! # Environment Variables
//!
//! - `TIENDA_CATALOG_URL` - Product listing endpoint
//! - `TIENDA_CATEGORY_SEED` - Fixed seed for category assignment

use tienda_core::CategoryFilter;
use tienda_storefront::catalog::{CatalogClient, CatalogStore, RandomCategories};
use tienda_storefront::config::StorefrontConfig;

use super::CommandError;

/// Fetch the catalog and print the products passing `filter`.
pub async fn list(filter: CategoryFilter) -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?.catalog;

    let client = CatalogClient::new(config.url, config.timeout)?;
    tracing::info!(endpoint = %client.endpoint(), "Fetching catalog");
    let records = client.fetch_products().await?;

    let assigner = config
        .category_seed
        .map_or_else(RandomCategories::from_os_rng, RandomCategories::seeded);
    let mut catalog = CatalogStore::new(assigner);
    catalog.load(records);

    let products = catalog.filter(filter);

    #[allow(clippy::print_stdout)]
    {
        for product in &products {
            println!(
                "{:>4}  {:<10} {:>10}  {}",
                product.id.as_i32(),
                product.category.label(),
                product.price.display(),
                product.title
            );
        }
        println!("{} product(s) in {}", products.len(), filter.name());
    }

    Ok(())
}
