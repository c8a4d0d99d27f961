use actix_web::HttpResponse;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::{alert_level_to_str, redirect};
use serde::Deserialize;
use tera::Context;

use crate::domain::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod accounts;
pub mod blog;
pub mod comments;
pub mod pages;
pub mod posts;

/// Template context shared by every page. The blog keeps its own user model
/// so `current_user` is filled here instead of by the common helper.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

/// Response for service errors that do not re-render a form.
///
/// Acting on someone else's post or comment looks exactly like a successful
/// no-op: the client is sent to `success_url`.
pub fn service_error_response(err: ServiceError, success_url: &str) -> HttpResponse {
    match err {
        ServiceError::NotAuthor => {
            log::warn!("Ignored change by a non-author, redirecting to {success_url}");
            redirect(success_url)
        }
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Unauthorized => redirect(crate::identity::LOGIN_URL),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            FlashMessage::error(message).send();
            redirect(success_url)
        }
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}

/// `?page=` of a paginated feed.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page number; `None` when the parameter is not a number.
    pub fn page(&self) -> Option<usize> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Some(1),
            Some(value) => value.parse().ok(),
        }
    }
}
