use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::routes::render_template;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::routes::base_context;

#[get("/pages/about/")]
pub async fn about(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, user.as_ref(), "about");
    render_template(&tera, "pages/about.html", &context)
}

#[get("/pages/rules/")]
pub async fn rules(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, user.as_ref(), "rules");
    render_template(&tera, "pages/rules.html", &context)
}
