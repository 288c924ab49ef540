//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels (overridable through `RUST_LOG`)
//! - Console output
//! - JSON-formatted local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use nova_intake::logging::init_logging;
//! use nova_intake::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(port = 8000, "Server starting");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a read endpoint answering with empty defaults because the store is down
///
/// # Example
///
/// ```no_run
/// use nova_intake::log_store_degraded;
///
/// let error = "Database not configured";
/// log_store_degraded!("/api/uploads/recent", error);
/// ```
#[macro_export]
macro_rules! log_store_degraded {
    ($route:expr, $error:expr) => {
        tracing::warn!(
            route = $route,
            error = %$error,
            "Document store unavailable, returning defaults"
        );
    };
}
