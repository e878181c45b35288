#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the Sylithe marketing site.
//!
//! Serves the routed marketing pages (home, platform, solutions,
//! methodology and insights) from an embedded page registry, the signup
//! and login forms, and a JSON health check. Forms are validated and
//! acknowledged but never stored.

mod handlers;
pub mod interactive;
pub mod pages;
pub mod render;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use thiserror::Error;

pub use pages::PageRegistry;

/// Default port when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid page definition {file}")]
    Page {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Duplicate page slug /{slug}")]
    DuplicateSlug { slug: String },
}

/// Registers every route. Expects a `web::Data<PageRegistry>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(handlers::health))
        .service(
            web::resource("/signup")
                .route(web::get().to(handlers::signup_form))
                .route(web::post().to(handlers::signup_submit)),
        )
        .service(
            web::resource("/login")
                .route(web::get().to(handlers::login_form))
                .route(web::post().to(handlers::login_submit)),
        )
        .route("/", web::get().to(handlers::home))
        .route("/{path:.*}", web::get().to(handlers::page));
}

/// Bind address and port from `BIND_ADDR` and `PORT`.
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (bind_addr, port)
}

/// Starts the marketing site.
///
/// Loads the page registry and serves it until the server stops. This is
/// a regular async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`) and initialises logging.
///
/// # Errors
///
/// * If a page definition fails to load
/// * If the HTTP server fails to bind or encounters a runtime error
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), SiteError> {
    let registry = web::Data::new(PageRegistry::load()?);
    log::info!("Loaded {} pages", registry.len());

    let (bind_addr, port) = bind_from_env();
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(registry.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
