use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::comments::{CommentForm, CommentFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, service_error_response};
use crate::services::ServiceError;
use crate::services::comments::{
    add_comment as add_comment_service, delete_comment as delete_comment_service,
    load_comment_for_edit, update_comment as update_comment_service,
};

fn detail_url(post_id: i32) -> String {
    format!("/posts/{post_id}/")
}

/// Render `blog/comment.html` in `create`, `edit` or `delete` mode.
#[allow(clippy::too_many_arguments)]
fn render_comment_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    mode: &str,
    post_id: i32,
    comment_id: Option<i32>,
    form: &CommentForm,
    errors: &[String],
) -> HttpResponse {
    let mut context = base_context(flash_messages, user, "comment");
    context.insert("mode", mode);
    context.insert("post_id", &post_id);
    context.insert("comment_id", &comment_id);
    context.insert("form", form);
    context.insert("errors", errors);
    render_template(tera, "blog/comment.html", &context)
}

#[post("/posts/{post_id}/comment")]
pub async fn add_comment(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CommentForm>,
) -> impl Responder {
    let post_id = post_id.into_inner();

    let result = CommentFormPayload::try_from(form.clone())
        .map_err(ServiceError::from)
        .and_then(|payload| add_comment_service(post_id, payload, &user, repo.get_ref()));

    match result {
        Ok(_) => redirect(&detail_url(post_id)),
        Err(ServiceError::Form(message)) => render_comment_form(
            &tera,
            &flash_messages,
            Some(&user),
            "create",
            post_id,
            None,
            &form,
            &[message],
        ),
        Err(err) => service_error_response(err, &detail_url(post_id)),
    }
}

#[get("/posts/{post_id}/comment/{comment_id}/edit")]
pub async fn edit_comment_form(
    path: web::Path<(i32, i32)>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (post_id, comment_id) = path.into_inner();

    match load_comment_for_edit(post_id, comment_id, user.as_ref(), repo.get_ref()) {
        Ok(comment) => render_comment_form(
            &tera,
            &flash_messages,
            user.as_ref(),
            "edit",
            post_id,
            Some(comment_id),
            &CommentForm {
                text: comment.text.into_inner(),
            },
            &[],
        ),
        Err(err) => service_error_response(err, &detail_url(post_id)),
    }
}

#[post("/posts/{post_id}/comment/{comment_id}/edit")]
pub async fn edit_comment(
    path: web::Path<(i32, i32)>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CommentForm>,
) -> impl Responder {
    let (post_id, comment_id) = path.into_inner();
    let success_url = detail_url(post_id);

    if let Err(err) = load_comment_for_edit(post_id, comment_id, user.as_ref(), repo.get_ref()) {
        return service_error_response(err, &success_url);
    }

    let result = CommentFormPayload::try_from(form.clone())
        .map_err(ServiceError::from)
        .and_then(|payload| {
            update_comment_service(post_id, comment_id, payload, user.as_ref(), repo.get_ref())
        });

    match result {
        Ok(()) => redirect(&success_url),
        Err(ServiceError::Form(message)) => render_comment_form(
            &tera,
            &flash_messages,
            user.as_ref(),
            "edit",
            post_id,
            Some(comment_id),
            &form,
            &[message],
        ),
        Err(err) => service_error_response(err, &success_url),
    }
}

#[get("/posts/{post_id}/comment/{comment_id}/delete")]
pub async fn delete_comment_form(
    path: web::Path<(i32, i32)>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (post_id, comment_id) = path.into_inner();

    match load_comment_for_edit(post_id, comment_id, user.as_ref(), repo.get_ref()) {
        Ok(comment) => render_comment_form(
            &tera,
            &flash_messages,
            user.as_ref(),
            "delete",
            post_id,
            Some(comment_id),
            &CommentForm {
                text: comment.text.into_inner(),
            },
            &[],
        ),
        Err(err) => service_error_response(err, &detail_url(post_id)),
    }
}

#[post("/posts/{post_id}/comment/{comment_id}/delete")]
pub async fn delete_comment(
    path: web::Path<(i32, i32)>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (post_id, comment_id) = path.into_inner();
    let success_url = detail_url(post_id);

    match delete_comment_service(post_id, comment_id, user.as_ref(), repo.get_ref()) {
        Ok(()) => redirect(&success_url),
        Err(err) => service_error_response(err, &success_url),
    }
}
