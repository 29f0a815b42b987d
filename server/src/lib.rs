//! Pantry Server - subscription meal delivery allocation core
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # Config, state, HTTP server
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── entitlement/   # Membership status -> booking rights
//! ├── slots/         # Delivery slot selection and availability
//! ├── pricing/       # Server-authoritative order totals
//! ├── loyalty/       # Points ledger and reward redemption
//! ├── membership/    # Lifecycle state machine
//! ├── orders/        # Draft validation and submission
//! └── utils/         # Errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod entitlement;
pub mod loyalty;
pub mod membership;
pub mod orders;
pub mod pricing;
pub mod slots;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use orders::OrderDraft;
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResult};

/// Load .env, prepare the work directory and initialize logging.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    if config.environment == "production" {
        init_logger_with_file(None, log_dir.to_str());
    } else {
        init_logger();
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____              __
   / __ \____ _____  / /________  __
  / /_/ / __ `/ __ \/ __/ ___/ / / /
 / ____/ /_/ / / / / /_/ /  / /_/ /
/_/    \__,_/_/ /_/\__/_/   \__, /
                           /____/
    "#
    );
}
