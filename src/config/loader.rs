//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseTarget, Environment, NovaConfig, PostgreSQLConfig};
use super::secret::secret_string;
use crate::domain::errors::NovaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Prefix of every override variable
pub const ENV_PREFIX: &str = "NOVA_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into NovaConfig
/// 4. Applies environment variable overrides (NOVA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use nova_intake::config::loader::load_config;
///
/// let config = load_config("nova.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NovaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(NovaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        NovaError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration, falling back to defaults when the file does not exist
///
/// Environment overrides and validation still apply, so a container can be
/// configured entirely through `NOVA_*` variables.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<NovaConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file not found, using defaults");
    finish(NovaConfig::default())
}

/// Parses configuration from TOML text
///
/// # Errors
///
/// Returns an error if substitution, parsing, overrides or validation fail.
pub fn parse_config(contents: &str) -> Result<NovaConfig> {
    let contents = substitute_env_vars(contents)?;

    let config: NovaConfig = toml::from_str(&contents)
        .map_err(|e| NovaError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(config)
}

fn finish(mut config: NovaConfig) -> Result<NovaConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        NovaError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| NovaError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                if !missing_vars.iter().any(|v| v == var_name) {
                    missing_vars.push(var_name.to_string());
                }
                String::new()
            })
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(NovaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                NovaError::Configuration(format!("Invalid value for {ENV_PREFIX}{key}: {e}"))
            })
        })
        .transpose()
}

/// Applies environment variable overrides using NOVA_* prefix
///
/// Environment variables follow the pattern: NOVA_<SECTION>_<KEY>
/// For example: NOVA_SERVER_PORT, NOVA_NOTIFICATION_SMTP_HOST
///
/// Setting `NOVA_POSTGRESQL_CONNECTION_STRING` creates the `[postgresql]`
/// section if the file had none.
fn apply_env_overrides(config: &mut NovaConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_var("ENVIRONMENT") {
        config.environment = match val.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(NovaError::Configuration(format!(
                    "Invalid value for {ENV_PREFIX}ENVIRONMENT: {other}"
                )))
            }
        };
    }

    // Server overrides
    if let Some(val) = env_var("SERVER_HOST") {
        config.server.host = val;
    }
    if let Some(port) = env_parse("SERVER_PORT")? {
        config.server.port = port;
    }
    if let Some(val) = env_var("SERVER_CORS_ORIGINS") {
        config.server.cors_origins = val
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(mb) = env_parse("SERVER_MAX_UPLOAD_MB")? {
        config.server.max_upload_mb = mb;
    }

    // Store selection
    if let Some(val) = env_var("DATABASE_TARGET") {
        config.database_target = match val.to_lowercase().as_str() {
            "postgresql" => DatabaseTarget::PostgreSQL,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(NovaError::Configuration(format!(
                    "Invalid value for {ENV_PREFIX}DATABASE_TARGET: {other}"
                )))
            }
        };
    }

    // PostgreSQL overrides
    if let Some(val) = env_var("POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg) => pg.connection_string = secret_string(val),
            None => {
                config.postgresql = Some(PostgreSQLConfig::with_connection_string(secret_string(val)))
            }
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Some(val) = env_var("POSTGRESQL_DATABASE_NAME") {
            pg.database_name = val;
        }
        if let Some(max) = env_parse("POSTGRESQL_MAX_CONNECTIONS")? {
            pg.max_connections = max;
        }
        if let Some(val) = env_var("POSTGRESQL_SSL_MODE") {
            pg.ssl_mode = val;
        }
    }

    // Notification overrides
    if let Some(val) = env_var("NOTIFICATION_OWNER_EMAIL") {
        config.notification.owner_email = val;
    }
    if let Some(val) = env_var("NOTIFICATION_SMTP_HOST") {
        config.notification.smtp_host = Some(val);
    }
    if let Some(port) = env_parse("NOTIFICATION_SMTP_PORT")? {
        config.notification.smtp_port = port;
    }
    if let Some(val) = env_var("NOTIFICATION_SMTP_USER") {
        config.notification.smtp_user = Some(val);
    }
    if let Some(val) = env_var("NOTIFICATION_FROM_EMAIL") {
        config.notification.from_email = Some(val);
    }
    if let Some(val) = env_var("NOTIFICATION_SMTP_PASSWORD") {
        config.notification.smtp_password = Some(secret_string(val));
    }

    // Logging overrides
    if let Some(enabled) = env_parse("LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Some(val) = env_var("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
