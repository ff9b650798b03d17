//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutating handler responds with an `HX-Trigger: cart-updated` header
//! so the cart count badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tienda_core::ProductId;
use tracing::instrument;

use crate::cart::{Cart, CartLine};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// HTMX event fired after every cart mutation.
pub const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// A transient message shown in the notification area.
///
/// The message fades out after `seconds` via the `notification-fade` CSS
/// animation.
#[derive(Clone, Copy)]
pub struct Notification {
    pub message: &'static str,
    pub kind: &'static str,
    pub seconds: u8,
}

impl Notification {
    /// Seconds a notification stays on screen unless overridden.
    pub const DEFAULT_SECONDS: u8 = 3;

    #[must_use]
    pub const fn success(message: &'static str) -> Self {
        Self {
            message,
            kind: "success",
            seconds: Self::DEFAULT_SECONDS,
        }
    }

    #[must_use]
    pub const fn warning(message: &'static str) -> Self {
        Self {
            message,
            kind: "warning",
            seconds: Self::DEFAULT_SECONDS,
        }
    }

    /// Keep the notification on screen for `seconds` instead.
    #[must_use]
    pub const fn lasting(self, seconds: u8) -> Self {
        Self { seconds, ..self }
    }
}

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.as_i32(),
            title: line.title.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            unit_price: line.price.display(),
            line_total: line.line_total().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Change quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u64,
    pub notification: Option<Notification>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub notification: Option<Notification>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
    pub notification: Option<Notification>,
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.cart().await;
    CartShowTemplate {
        cart: CartView::from(store.cart()),
        cart_count: store.total_item_count(),
        notification: None,
    }
}

/// Add one unit of a product to the cart (HTMX).
///
/// Returns the updated count badge. Products that are not in the loaded
/// catalog cannot be added.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .await
        .get(form.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let count = {
        let mut store = state.cart().await;
        store.add_item(&product).item_count()
    };

    let id = product.id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", id.as_str())]));

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartCountTemplate {
            count,
            notification: Some(Notification::success("Product added to cart")),
        },
    )
        .into_response())
}

/// Change a line's quantity by `delta` (HTMX).
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    let cart = {
        let mut store = state.cart().await;
        CartView::from(store.change_quantity(form.product_id, form.delta))
    };

    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart,
            notification: None,
        },
    )
        .into_response()
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let cart = {
        let mut store = state.cart().await;
        CartView::from(store.remove_item(form.product_id))
    };

    let id = form.product_id.to_string();
    add_breadcrumb("cart", "Removed product", Some(&[("product_id", id.as_str())]));

    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart,
            notification: Some(Notification::warning("Product removed from cart")),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        count: state.cart().await.total_item_count(),
        notification: None,
    }
}

/// Simulated checkout: empties the cart (HTMX).
///
/// An empty cart is left alone and no event is fired.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Response {
    let mut store = state.cart().await;

    if store.cart().is_empty() {
        return CartItemsTemplate {
            cart: CartView::from(store.cart()),
            notification: None,
        }
        .into_response();
    }

    let items = store.total_item_count();
    let total = store.total_price();
    let cart = CartView::from(store.clear());
    drop(store);

    tracing::info!(items, total = %total, "Checkout completed");
    add_breadcrumb("cart", "Checkout completed", None);

    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart,
            notification: Some(Notification::success("Purchase completed!")),
        },
    )
        .into_response()
}
