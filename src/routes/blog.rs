use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::routes::render_template;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{PageQuery, base_context};
use crate::services::ServiceError;
use crate::services::listing::{
    show_category as show_category_service, show_index as show_index_service,
    show_profile as show_profile_service,
};

#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(page) = query.page() else {
        return HttpResponse::NotFound().finish();
    };

    match show_index_service(page, repo.get_ref()) {
        Ok(posts) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("posts", &posts.items);
            context.insert("page_obj", &posts.into_paginated());
            render_template(&tera, "blog/index.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{category_slug}/")]
pub async fn category_posts(
    category_slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(page) = query.page() else {
        return HttpResponse::NotFound().finish();
    };

    match show_category_service(&category_slug, page, repo.get_ref()) {
        Ok(feed) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "category");
            context.insert("category", &feed.category);
            context.insert("posts", &feed.posts.items);
            context.insert("page_obj", &feed.posts.into_paginated());
            render_template(&tera, "blog/category.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render category page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/profile/{username}/")]
pub async fn profile(
    username: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    query: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(page) = query.page() else {
        return HttpResponse::NotFound().finish();
    };

    match show_profile_service(&username, user.as_ref(), page, repo.get_ref()) {
        Ok(feed) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "profile");
            context.insert("profile", &feed.profile);
            context.insert("is_owner", &feed.is_owner);
            context.insert("posts", &feed.posts.items);
            context.insert("page_obj", &feed.posts.into_paginated());
            render_template(&tera, "blog/profile.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render profile page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
