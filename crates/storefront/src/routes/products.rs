//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tienda_core::CategoryFilter;
use tracing::instrument;

use crate::catalog::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub category_slug: &'static str,
    pub category_label: &'static str,
    pub price: String,
    pub image: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            category_slug: product.category.slug(),
            category_label: product.category.label(),
            price: product.price.display(),
            image: product.image.clone(),
        }
    }
}

/// Category filter button display data.
#[derive(Clone)]
pub struct FilterView {
    pub slug: &'static str,
    pub name: &'static str,
    pub active: bool,
}

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub category_filters: Vec<FilterView>,
    pub active_filter: &'static str,
    pub loaded: bool,
    pub catalog_error: Option<String>,
    pub cart_count: u64,
}

/// Display the product grid, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<impl IntoResponse> {
    let filter = query
        .category
        .as_deref()
        .map(str::parse::<CategoryFilter>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .unwrap_or_default();

    let (products, loaded, catalog_error) = {
        let catalog = state.catalog().await;
        let products: Vec<ProductView> = catalog
            .filter(filter)
            .into_iter()
            .map(ProductView::from)
            .collect();
        (
            products,
            catalog.is_loaded(),
            catalog.failure().map(str::to_owned),
        )
    };

    let cart_count = state.cart().await.total_item_count();

    let category_filters = CategoryFilter::options()
        .map(|option| FilterView {
            slug: option.slug(),
            name: option.name(),
            active: option == filter,
        })
        .collect();

    Ok(ProductsIndexTemplate {
        products,
        category_filters,
        active_filter: filter.slug(),
        loaded,
        catalog_error,
        cart_count,
    })
}

/// Re-fetch the catalog after a failed load, then show the grid again.
#[instrument(skip(state))]
pub async fn retry(State(state): State<AppState>) -> Redirect {
    // Failures are logged and recorded on the catalog by `refresh_catalog`.
    if let Ok(count) = state.refresh_catalog().await {
        tracing::info!(products = count, "Catalog reloaded on retry");
    }

    Redirect::to("/products")
}
