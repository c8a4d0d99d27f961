//! Cross-site form post rejection and templated error pages.

use std::future::{Future, Ready, ready};
use std::pin::Pin;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::{Method, StatusCode};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{Error, HttpResponse, web};
use tera::{Context, Tera};
use url::Url;

use crate::identity::current_user;

/// Whether a request claiming to come from `origin` (or, failing that,
/// `referer`) targets the same `host`. Requests carrying neither header are
/// let through. Hosts and ports are compared after URL parsing, so userinfo
/// and explicit default ports do not matter.
pub fn is_same_origin(host: &str, origin: Option<&str>, referer: Option<&str>) -> bool {
    let Some(source) = origin.or(referer) else {
        return true;
    };
    let Ok(source) = Url::parse(source) else {
        return false;
    };
    let Ok(target) = Url::parse(&format!("{}://{host}", source.scheme())) else {
        return false;
    };
    source.host_str().is_some()
        && source.host_str() == target.host_str()
        && source.port_or_known_default() == target.port_or_known_default()
}

fn request_is_same_origin(req: &ServiceRequest) -> bool {
    let header_str = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };
    let origin = header_str(header::ORIGIN);
    let referer = header_str(header::REFERER);
    let info = req.connection_info();
    is_same_origin(info.host(), origin, referer)
}

/// Rejects `POST` requests whose `Origin`/`Referer` point at another site.
pub struct SameOriginCheck;

impl<S, B> Transform<S, ServiceRequest> for SameOriginCheck
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SameOriginCheckService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SameOriginCheckService { service }))
    }
}

pub struct SameOriginCheckService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SameOriginCheckService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::POST && !request_is_same_origin(&req) {
            log::warn!("Rejected cross-origin POST to {}", req.path());
            let (request, _payload) = req.into_parts();
            let response = HttpResponse::Forbidden().finish().map_into_right_body();
            return Box::pin(async { Ok(ServiceResponse::new(request, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Replace the body of an error response with a rendered template. The
/// original response is kept when no template engine is registered or
/// rendering fails.
fn render_error_page<B>(
    res: ServiceResponse<B>,
    template: &str,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let rendered = res.request().app_data::<web::Data<Tera>>().and_then(|tera| {
        let mut context = Context::new();
        context.insert("current_user", &current_user(res.request()));
        context.insert("alerts", &Vec::<(String, String)>::new());
        tera.render(template, &context)
            .map_err(|e| log::error!("Failed to render error page '{template}': {e}"))
            .ok()
    });

    let Some(body) = rendered else {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    };

    let (req, mut res) = res.into_parts();
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    let res = res.set_body(body);
    let res = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

fn not_found<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    render_error_page(res, "pages/404.html")
}

fn forbidden<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    render_error_page(res, "pages/403csrf.html")
}

fn internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    render_error_page(res, "pages/500.html")
}

/// Error pages for 404, 403 and 500 responses.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found)
        .handler(StatusCode::FORBIDDEN, forbidden)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, internal_error)
}
