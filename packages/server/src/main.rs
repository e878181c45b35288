#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the Sylithe marketing site.

#[actix_web::main]
async fn main() -> Result<(), sylithe_server::SiteError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    sylithe_server::run_server().await
}
