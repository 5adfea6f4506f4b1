use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// True when the service runs with `ENVIRONMENT=prod`.
pub fn is_prod() -> bool {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod"
}

/// Read an environment variable with dev defaults.
///
/// In production every variable must be set explicitly; outside production a
/// missing variable falls back to `default` when one is given.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_uses_default_outside_prod() {
        let value = get_env("SERVICE_CORE_TEST_NEVER_SET", Some("fallback"), false)
            .expect("default should apply");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn missing_var_is_an_error_in_prod_even_with_default() {
        let result = get_env("SERVICE_CORE_TEST_NEVER_SET", Some("fallback"), true);
        assert!(result.is_err());
    }

    #[test]
    fn missing_var_without_default_is_an_error() {
        let result = get_env("SERVICE_CORE_TEST_NEVER_SET", None, false);
        assert!(result.is_err());
    }

    #[test]
    fn set_var_wins_over_default() {
        // Unique name so parallel tests cannot race on it.
        unsafe { env::set_var("SERVICE_CORE_TEST_SET_VAR_WINS", "explicit") };
        let value = get_env("SERVICE_CORE_TEST_SET_VAR_WINS", Some("fallback"), false)
            .expect("set var should be read");
        assert_eq!(value, "explicit");
    }
}
