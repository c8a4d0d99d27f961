use std::process;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use pushkind_common::db::establish_connection_pool;
use tera::Tera;

use pushkind_blog::middleware::{SameOriginCheck, error_handlers};
use pushkind_blog::models::config::ServerConfig;
use pushkind_blog::repository::DieselRepository;
use pushkind_blog::routes::accounts::{
    edit_profile, edit_profile_form, login, login_form, logout, password_change,
    password_change_form, register, registration_form,
};
use pushkind_blog::routes::blog::{category_posts, index, profile};
use pushkind_blog::routes::comments::{
    add_comment, delete_comment, delete_comment_form, edit_comment, edit_comment_form,
};
use pushkind_blog::routes::pages::{about, rules};
use pushkind_blog::routes::posts::{
    create_post, create_post_form, delete_post, delete_post_form, edit_post, edit_post_form,
    multipart_form_config, post_detail,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let server_config = match ServerConfig::load(&app_env) {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            process::exit(1);
        }
    };

    let tera = match Tera::new(&format!("{}/**/*.html", server_config.templates_dir)) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            process::exit(1);
        }
    };

    let secret_key = Key::from(server_config.secret_key.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let repo = web::Data::new(DieselRepository::new(pool));
    let tera = web::Data::new(tera);
    let bind_address = (server_config.address.clone(), server_config.port);
    let server_config = web::Data::new(server_config);

    log::info!(
        "Starting blog server on {}:{} ({app_env})",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(SameOriginCheck)
            .wrap(error_handlers())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(message_framework.clone())
            .wrap(Logger::default())
            .service(Files::new("/static", &server_config.static_dir))
            .service(Files::new("/media", &server_config.media_dir))
            .service(index)
            .service(category_posts)
            .service(profile)
            .service(create_post_form)
            .service(create_post)
            .service(post_detail)
            .service(edit_post_form)
            .service(edit_post)
            .service(delete_post_form)
            .service(delete_post)
            .service(add_comment)
            .service(edit_comment_form)
            .service(edit_comment)
            .service(delete_comment_form)
            .service(delete_comment)
            .service(edit_profile_form)
            .service(edit_profile)
            .service(login_form)
            .service(login)
            .service(logout)
            .service(registration_form)
            .service(register)
            .service(password_change_form)
            .service(password_change)
            .service(about)
            .service(rules)
            .app_data(repo.clone())
            .app_data(tera.clone())
            .app_data(server_config.clone())
            .app_data(multipart_form_config())
    })
    .bind(bind_address)?
    .run()
    .await
}
