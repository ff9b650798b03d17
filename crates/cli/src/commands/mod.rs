//! CLI command implementations.

pub mod cart;
pub mod catalog;

use thiserror::Error;
use tienda_storefront::cart::StorageError;
use tienda_storefront::catalog::CatalogError;
use tienda_storefront::config::ConfigError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be fetched.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The cart snapshot could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
