//! Configuration management for Nova Intake.
//!
//! Nova Intake reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `NOVA_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation with descriptive messages
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//! database_target = "postgresql"
//!
//! [server]
//! port = 8000
//! cors_origins = ["https://app.nova.example"]
//!
//! [postgresql]
//! connection_string = "${NOVA_DATABASE_URL}"
//! database_name = "nova"
//! ssl_mode = "require"
//!
//! [notification]
//! owner_email = "ops@nova.example"
//! smtp_host = "smtp.nova.example"
//! smtp_user = "relay@nova.example"
//! smtp_password = "${NOVA_SMTP_PASSWORD}"
//! ```
//!
//! ```rust,no_run
//! use nova_intake::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("nova.toml")?;
//! println!("Listening on {}", config.server.socket_addr());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    ApplicationConfig, DatabaseTarget, Environment, LoggingConfig, NotificationConfig,
    NovaConfig, PostgreSQLConfig, ServerConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
