//! HTTP handler functions for the marketing site.

use actix_web::{HttpResponse, http::StatusCode, web};
use sylithe_server_models::{ApiHealth, LoginForm, SignupForm};

use crate::pages::PageRegistry;
use crate::render;

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// `GET /api/health`
pub async fn health(registry: web::Data<PageRegistry>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        pages: registry.len(),
    })
}

fn render_page(registry: &PageRegistry, path: &str) -> HttpResponse {
    registry.get(path).map_or_else(
        || {
            log::debug!("No page registered for /{path}");
            html(
                StatusCode::NOT_FOUND,
                render::not_found(registry, &format!("/{path}")),
            )
        },
        |page| html(StatusCode::OK, render::page(registry, page)),
    )
}

/// `GET /`
pub async fn home(registry: web::Data<PageRegistry>) -> HttpResponse {
    render_page(&registry, "")
}

/// `GET /{path..}`
///
/// Unregistered paths render the not-found page with a 404.
pub async fn page(registry: web::Data<PageRegistry>, path: web::Path<String>) -> HttpResponse {
    render_page(&registry, &path)
}

/// `GET /signup`
pub async fn signup_form() -> HttpResponse {
    html(StatusCode::OK, render::signup(&SignupForm::default(), &[]))
}

/// `POST /signup`
///
/// Validates the submission and either re-renders the form with messages
/// (422) or acknowledges it. Nothing is stored.
pub async fn signup_submit(form: web::Form<SignupForm>) -> HttpResponse {
    let form = form.into_inner();
    let errors = form.validate();

    if errors.is_empty() {
        log::info!("Signup form accepted");
        html(
            StatusCode::OK,
            render::acknowledgement(
                "Thanks for signing up",
                &format!(
                    "Welcome, {}. Account creation is not open yet; we will be in touch at {}.",
                    form.name.trim(),
                    form.email.trim()
                ),
            ),
        )
    } else {
        log::debug!("Signup form rejected with {} error(s)", errors.len());
        html(
            StatusCode::UNPROCESSABLE_ENTITY,
            render::signup(&form, &errors),
        )
    }
}

/// `GET /login`
pub async fn login_form() -> HttpResponse {
    html(StatusCode::OK, render::login(&LoginForm::default(), &[]))
}

/// `POST /login`
pub async fn login_submit(form: web::Form<LoginForm>) -> HttpResponse {
    let form = form.into_inner();
    let errors = form.validate();

    if errors.is_empty() {
        log::info!("Login form accepted");
        html(
            StatusCode::OK,
            render::acknowledgement(
                "Welcome back",
                "Sign-in is not available yet. Your details were not stored.",
            ),
        )
    } else {
        html(
            StatusCode::UNPROCESSABLE_ENTITY,
            render::login(&form, &errors),
        )
    }
}
