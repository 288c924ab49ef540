//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Nova Intake configuration file.

use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading runs substitution, overrides and validation
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Listen Address: {}", config.server.socket_addr());
        if config.server.cors_origins.is_empty() {
            println!("  CORS Origins: any");
        } else {
            println!("  CORS Origins: {}", config.server.cors_origins.join(", "));
        }
        println!("  Max Upload: {} MB", config.server.max_upload_mb);

        match config.database_target {
            DatabaseTarget::Memory => {
                println!("  Database Target: memory (records are lost on restart)");
            }
            DatabaseTarget::PostgreSQL => match config.postgresql {
                Some(ref pg_config) => {
                    use secrecy::ExposeSecret;
                    println!("  Database Target: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        pg_config
                            .connection_string
                            .expose_secret()
                            .split('@')
                            .next_back()
                            .unwrap_or("***")
                    );
                    println!("  PostgreSQL Schema: {}", pg_config.database_name);
                    println!("  Max Connections: {}", pg_config.max_connections);
                }
                None => {
                    println!("  Database Target: PostgreSQL");
                    println!("  ⚠️  No [postgresql] section; store-backed requests will answer 503");
                }
            },
        }

        println!("  Report Owner: {}", config.notification.owner_email);
        if config.notification.credentials_configured() {
            println!(
                "  Notifications: enabled via {}:{}",
                config.notification.smtp_host.as_deref().unwrap_or_default(),
                config.notification.smtp_port
            );
        } else {
            println!("  Notifications: disabled (reports are stored only)");
        }
        println!();
        Ok(0)
    }
}
