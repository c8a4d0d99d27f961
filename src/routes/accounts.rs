use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, route, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::{redirect, render_template};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::accounts::{
    LoginForm, LoginFormPayload, PasswordChangeForm, PasswordChangeFormPayload, ProfileForm,
    ProfileFormPayload, RegistrationForm, RegistrationFormPayload,
};
use crate::identity::{remember, safe_next};
use crate::repository::DieselRepository;
use crate::routes::{base_context, service_error_response};
use crate::services::ServiceError;
use crate::services::accounts::{
    authenticate, change_password as change_password_service, load_profile,
    register as register_service, update_profile as update_profile_service,
};

fn render_form<T: serde::Serialize>(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    template: &str,
    form: &T,
    errors: &[String],
) -> HttpResponse {
    let mut context = base_context(flash_messages, user, template);
    context.insert("form", form);
    context.insert("errors", errors);
    render_template(tera, template, &context)
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: String,
}

#[get("/auth/login/")]
pub async fn login_form(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    query: web::Query<NextQuery>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let form = LoginForm {
        next: query.into_inner().next,
        ..LoginForm::default()
    };
    render_form(
        &tera,
        &flash_messages,
        user.as_ref(),
        "registration/login.html",
        &form,
        &[],
    )
}

#[post("/auth/login/")]
pub async fn login(
    req: HttpRequest,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let result = LoginFormPayload::try_from(form.clone())
        .map_err(ServiceError::from)
        .and_then(|payload| authenticate(payload, repo.get_ref()));

    match result {
        Ok(user) => {
            if let Err(e) = remember(&req, &user) {
                log::error!("Failed to start session: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            log::info!("User {} logged in", user.username);
            redirect(safe_next(&form.next).unwrap_or("/"))
        }
        Err(ServiceError::Form(message)) => render_form(
            &tera,
            &flash_messages,
            None,
            "registration/login.html",
            &form,
            &[message],
        ),
        Err(err) => service_error_response(err, "/auth/login/"),
    }
}

#[route("/auth/logout/", method = "GET", method = "POST")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/")
}

#[get("/auth/registration/")]
pub async fn registration_form(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        &tera,
        &flash_messages,
        user.as_ref(),
        "registration/registration_form.html",
        &RegistrationForm::default(),
        &[],
    )
}

#[post("/auth/registration/")]
pub async fn register(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegistrationForm>,
) -> impl Responder {
    let result = RegistrationFormPayload::try_from(form.clone())
        .map_err(ServiceError::from)
        .and_then(|payload| register_service(payload, repo.get_ref()));

    match result {
        Ok(_) => {
            FlashMessage::success("Регистрация прошла успешно. Войдите в аккаунт.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => render_form(
            &tera,
            &flash_messages,
            None,
            "registration/registration_form.html",
            &form,
            &[message],
        ),
        Err(err) => service_error_response(err, "/auth/registration/"),
    }
}

#[get("/auth/password_change/")]
pub async fn password_change_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        &tera,
        &flash_messages,
        Some(&user),
        "registration/password_change.html",
        &(),
        &[],
    )
}

#[post("/auth/password_change/")]
pub async fn password_change(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<PasswordChangeForm>,
) -> impl Responder {
    let result = PasswordChangeFormPayload::try_from(form)
        .map_err(ServiceError::from)
        .and_then(|payload| change_password_service(payload, &user, repo.get_ref()));

    match result {
        Ok(()) => {
            FlashMessage::success("Пароль изменён.").send();
            redirect(&format!("/profile/{}/", user.username))
        }
        Err(ServiceError::Form(message)) => render_form(
            &tera,
            &flash_messages,
            Some(&user),
            "registration/password_change.html",
            &(),
            &[message],
        ),
        Err(err) => service_error_response(err, "/auth/password_change/"),
    }
}

#[get("/profile/edit")]
pub async fn edit_profile_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_profile(&user, repo.get_ref()) {
        Ok(profile) => render_form(
            &tera,
            &flash_messages,
            Some(&user),
            "blog/user.html",
            &ProfileForm::from(&profile),
            &[],
        ),
        Err(err) => service_error_response(err, "/"),
    }
}

#[post("/profile/edit")]
pub async fn edit_profile(
    req: HttpRequest,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    let result = ProfileFormPayload::try_from(form.clone())
        .map_err(ServiceError::from)
        .and_then(|payload| update_profile_service(payload, &user, repo.get_ref()));

    match result {
        Ok(refreshed) => {
            if let Err(e) = remember(&req, &refreshed) {
                log::error!("Failed to refresh session identity: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Профиль обновлён.").send();
            redirect(&format!("/profile/{}/", refreshed.username))
        }
        Err(ServiceError::Form(message)) => render_form(
            &tera,
            &flash_messages,
            Some(&user),
            "blog/user.html",
            &form,
            &[message],
        ),
        Err(err) => service_error_response(err, "/profile/edit"),
    }
}
