//! Interactive mode for the server.
//!
//! Prompts for bind address and port before starting the site.

use dialoguer::{Confirm, Input};

use crate::{DEFAULT_PORT, SiteError, bind_from_env};

/// Asks for a bind address and port, exports them as `BIND_ADDR` and
/// `PORT`, and delegates to [`super::run_server`].
///
/// # Errors
///
/// * If the server fails to start
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), SiteError> {
    println!("Sylithe Marketing Site");
    println!();

    let (default_addr, default_port) = bind_from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(default_addr.clone())
        .interact_text()
        .unwrap_or(default_addr);

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(default_port)
        .interact_text()
        .unwrap_or(DEFAULT_PORT);

    // SAFETY: called before the server starts any worker threads; the
    // variables are read once in `run_server`.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", port.to_string());
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
