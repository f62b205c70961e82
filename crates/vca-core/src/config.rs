use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a config
/// pointed at a gateway on `localhost:8000`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("VCA_ENV", "development"))?;

    let api_base_url = or_default("VCA_API_BASE_URL", "http://localhost:8000");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "VCA_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base_url}'"),
        });
    }

    let log_level = or_default("VCA_LOG_LEVEL", "info");
    let state_dir = PathBuf::from(or_default("VCA_STATE_DIR", "./.vca"));
    let export_dir = PathBuf::from(or_default("VCA_EXPORT_DIR", "."));
    let request_timeout_secs = parse_u64("VCA_REQUEST_TIMEOUT_SECS", "120")?;
    let user_agent = or_default("VCA_USER_AGENT", "vca/0.1 (content-dashboard)");
    let refresh_delay_ms = parse_u64("VCA_REFRESH_DELAY_MS", "1000")?;

    let operation_timeout_secs = match lookup("VCA_OPERATION_TIMEOUT_SECS") {
        Ok(raw) if !raw.trim().is_empty() => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: "VCA_OPERATION_TIMEOUT_SECS".to_string(),
                    reason: e.to_string(),
                })?;
            (secs > 0).then_some(secs)
        }
        _ => None,
    };

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        state_dir,
        export_dir,
        request_timeout_secs,
        user_agent,
        refresh_delay_ms,
        operation_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VCA_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
