//! Contact form route handlers.
//!
//! The form is validated server-side. A valid submission is only logged,
//! then the form is reset.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use tracing::instrument;

use crate::contact::{ContactForm, FieldErrors, validate_contact_form};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::routes::cart::Notification;
use crate::state::AppState;

/// Summary shown above a form that failed validation.
const FIX_ERRORS_MESSAGE: &str = "Please fix the errors in the form.";

/// Seconds the confirmation stays visible after a valid submission.
const CONFIRMATION_SECONDS: u8 = 5;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub form: ContactForm,
    pub errors: FieldErrors,
    pub warning: Option<&'static str>,
    pub notification: Option<Notification>,
    pub cart_count: u64,
}

/// Display the empty contact form.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    ContactTemplate {
        form: ContactForm::default(),
        errors: FieldErrors::default(),
        warning: None,
        notification: None,
        cart_count: state.cart().await.total_item_count(),
    }
}

/// Validate a contact form submission.
///
/// Invalid input is rendered back with per-field messages. A valid message
/// clears the form and shows a confirmation.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let cart_count = state.cart().await.total_item_count();

    match validate_contact_form(&form) {
        Ok(()) => {
            tracing::info!(
                name = %form.name.trim(),
                email = %form.email,
                message_chars = form.message.trim().chars().count(),
                "Contact message received"
            );
            add_breadcrumb("contact", "Message submitted", None);

            ContactTemplate {
                form: ContactForm::default(),
                errors: FieldErrors::default(),
                warning: None,
                notification: Some(
                    Notification::success("Message sent").lasting(CONFIRMATION_SECONDS),
                ),
                cart_count,
            }
        }
        Err(errors) => {
            tracing::debug!(?errors, "Contact form rejected");

            ContactTemplate {
                form,
                errors,
                warning: Some(FIX_ERRORS_MESSAGE),
                notification: None,
                cart_count,
            }
        }
    }
}
