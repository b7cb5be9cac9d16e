//! Storefront Server - catalog, image pipeline and order forwarding for a
//! Telegram mini-app shop
//!
//! # Module layout
//!
//! ```text
//! storefront-server/src/
//! ├── core/      # config, state, server
//! ├── catalog/   # JSON-file product store and service
//! ├── promo/     # promo codes
//! ├── media/     # cover-crop pipeline, banner, placeholder
//! ├── notify/    # Telegram notifications
//! ├── auth/      # admin token middleware
//! ├── api/       # HTTP routes and handlers
//! └── utils/     # logging
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod media;
pub mod notify;
pub mod promo;
pub mod utils;

pub use crate::core::{Config, Server, ServerError, ServerState};
pub use shared::{AppError, AppResult, ErrorCode};
pub use utils::logger::init_logger_with_file;

/// Security event log, written to the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and start logging
pub fn setup_environment() -> anyhow::Result<()> {
    // Missing .env is fine; real environment variables still apply
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    let json = std::env::var("LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(log_level.as_deref(), json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __                  ____                 __
  / ___// /_____  ________  / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}
