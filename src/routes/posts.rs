use std::path::Path;

use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::error::InternalError;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::post::PostWithRelations;
use crate::domain::types::ImagePath;
use crate::forms::comments::CommentForm;
use crate::forms::posts::{PUB_DATE_INPUT_FORMAT, PostForm, PostFormPayload, PostMultipartForm};
use crate::media::{check_post_image, remove_image, store_post_image};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, service_error_response};
use crate::services::posts::{
    check_post_references, create_post as create_post_service,
    delete_post as delete_post_service, load_post_for_edit, post_form_choices,
    show_post as show_post_service, update_post as update_post_service,
};
use crate::services::{ServiceError, ServiceResult};

fn detail_url(post_id: i32) -> String {
    format!("/posts/{post_id}/")
}

fn profile_url(user: &AuthenticatedUser) -> String {
    format!("/profile/{}/", user.username)
}

/// Largest multipart body accepted by the post form.
const MULTIPART_TOTAL_LIMIT: usize = 16 * 1024 * 1024;

/// Multipart settings for the post form. Bodies that cannot be extracted
/// send the user back to the form with an error message.
pub fn multipart_form_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(MULTIPART_TOTAL_LIMIT)
        .error_handler(|err, req| {
            log::warn!("Rejected post form submission to {}: {err}", req.path());
            FlashMessage::error("Не удалось принять форму. Проверьте размер изображения.").send();
            InternalError::from_response(err, redirect(req.path())).into()
        })
}

/// Validate the submission, then copy the upload into the media directory.
/// Nothing is stored for a form that would be rejected.
async fn prepare_post(
    form: &PostForm,
    upload: Option<TempFile>,
    repo: &DieselRepository,
    server_config: &ServerConfig,
) -> ServiceResult<(PostFormPayload, Option<ImagePath>)> {
    let payload = PostFormPayload::try_from(form.clone())?;
    if let Some(upload) = &upload {
        check_post_image(upload)?;
    }
    check_post_references(&payload, repo)?;

    let Some(upload) = upload else {
        return Ok((payload, None));
    };
    let media_dir = server_config.media_dir.clone();
    let stored = web::block(move || store_post_image(&upload, Path::new(&media_dir)))
        .await
        .map_err(|e| {
            log::error!("Image upload task failed: {e}");
            ServiceError::Internal
        })??;

    Ok((payload, Some(stored)))
}

/// Remove an image stored for a post that was not saved.
async fn discard_upload(image: Option<ImagePath>, server_config: &ServerConfig) {
    let Some(image) = image else {
        return;
    };
    let media_dir = server_config.media_dir.clone();
    match web::block(move || remove_image(&image, Path::new(&media_dir))).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::error!("Failed to remove unused upload: {e}"),
        Err(e) => log::error!("Upload cleanup task failed: {e}"),
    }
}

/// Render `blog/create.html` in one of its modes: `create`, `edit` or `delete`.
#[allow(clippy::too_many_arguments)]
fn render_post_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    repo: &DieselRepository,
    mode: &str,
    form: &PostForm,
    post: Option<&PostWithRelations>,
    errors: &[String],
) -> HttpResponse {
    let choices = match post_form_choices(repo) {
        Ok(choices) => choices,
        Err(err) => {
            log::error!("Failed to load post form choices: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(flash_messages, user, "post_form");
    context.insert("mode", mode);
    context.insert("form", form);
    context.insert("post", &post);
    context.insert("errors", errors);
    context.insert("categories", &choices.categories);
    context.insert("locations", &choices.locations);
    render_template(tera, "blog/create.html", &context)
}

#[get("/posts/{post_id}/")]
pub async fn post_detail(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_post_service(post_id.into_inner(), repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "post_detail");
            context.insert("post", &detail.post);
            context.insert("comments", &detail.comments);
            context.insert("form", &CommentForm::default());
            render_template(&tera, "blog/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render post detail: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/create")]
pub async fn create_post_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let form = PostForm {
        pub_date: Utc::now()
            .naive_utc()
            .format(PUB_DATE_INPUT_FORMAT)
            .to_string(),
        ..PostForm::default()
    };
    render_post_form(
        &tera,
        &flash_messages,
        Some(&user),
        repo.get_ref(),
        "create",
        &form,
        None,
        &[],
    )
}

#[post("/posts/create")]
pub async fn create_post(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<PostMultipartForm>,
) -> impl Responder {
    let (form, upload) = form.into_parts();

    let result = match prepare_post(&form, upload, repo.get_ref(), &server_config).await {
        Ok((payload, image)) => {
            let result = create_post_service(payload, image.clone(), &user, repo.get_ref());
            if result.is_err() {
                discard_upload(image, &server_config).await;
            }
            result
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => {
            FlashMessage::success("Публикация добавлена.").send();
            redirect(&profile_url(&user))
        }
        Err(ServiceError::Form(message)) => render_post_form(
            &tera,
            &flash_messages,
            Some(&user),
            repo.get_ref(),
            "create",
            &form,
            None,
            &[message],
        ),
        Err(err) => service_error_response(err, "/posts/create"),
    }
}

#[get("/posts/{post_id}/edit")]
pub async fn edit_post_form(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let post_id = post_id.into_inner();

    match load_post_for_edit(post_id, user.as_ref(), repo.get_ref()) {
        Ok(post) => render_post_form(
            &tera,
            &flash_messages,
            user.as_ref(),
            repo.get_ref(),
            "edit",
            &PostForm::from_post(&post),
            Some(&post),
            &[],
        ),
        Err(err) => service_error_response(err, &detail_url(post_id)),
    }
}

#[post("/posts/{post_id}/edit")]
pub async fn edit_post(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<PostMultipartForm>,
) -> impl Responder {
    let post_id = post_id.into_inner();
    let success_url = detail_url(post_id);

    // Non-authors are turned away before the upload is stored.
    let post = match load_post_for_edit(post_id, user.as_ref(), repo.get_ref()) {
        Ok(post) => post,
        Err(err) => return service_error_response(err, &success_url),
    };

    let (form, upload) = form.into_parts();

    let result = match prepare_post(&form, upload, repo.get_ref(), &server_config).await {
        Ok((payload, image)) => {
            let result = update_post_service(
                post_id,
                payload,
                image.clone(),
                user.as_ref(),
                repo.get_ref(),
            );
            if result.is_err() {
                discard_upload(image, &server_config).await;
            }
            result
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => {
            FlashMessage::success("Публикация обновлена.").send();
            redirect(&success_url)
        }
        Err(ServiceError::Form(message)) => render_post_form(
            &tera,
            &flash_messages,
            user.as_ref(),
            repo.get_ref(),
            "edit",
            &form,
            Some(&post),
            &[message],
        ),
        Err(err) => service_error_response(err, &success_url),
    }
}

#[get("/posts/{post_id}/delete")]
pub async fn delete_post_form(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_post_for_edit(post_id.into_inner(), user.as_ref(), repo.get_ref()) {
        Ok(post) => render_post_form(
            &tera,
            &flash_messages,
            user.as_ref(),
            repo.get_ref(),
            "delete",
            &PostForm::from_post(&post),
            Some(&post),
            &[],
        ),
        Err(err) => service_error_response(err, "/"),
    }
}

#[post("/posts/{post_id}/delete")]
pub async fn delete_post(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_post_service(post_id.into_inner(), user.as_ref(), repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Публикация удалена.").send();
            redirect("/")
        }
        Err(err) => service_error_response(err, "/"),
    }
}
