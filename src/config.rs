use std::{env, time::Duration};

use thiserror::Error;

use crate::gemini::DEFAULT_BASE_URL;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_VAR: &str = "QUIZGEN_MODEL";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const TIMEOUT_VAR: &str = "QUIZGEN_TIMEOUT_SECS";

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Google API key not found. Please set the GOOGLE_API_KEY environment variable.")]
    MissingApiKey,

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = lookup(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    key: TIMEOUT_VAR,
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    type Vars = HashMap<&'static str, &'static str>;

    fn lookup(vars: &Vars) -> impl Fn(&str) -> Option<String> + '_ {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn missing_key_is_fatal() {
        let vars = Vars::new();
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let vars = HashMap::from([(API_KEY_VAR, "  ")]);
        assert!(matches!(
            Config::from_lookup(lookup(&vars)),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn defaults_apply() {
        let vars = HashMap::from([(API_KEY_VAR, "secret")]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn overrides_are_read() {
        let vars = HashMap::from([
            (API_KEY_VAR, "secret"),
            (MODEL_VAR, "gemini-2.5-flash"),
            (BASE_URL_VAR, "http://localhost:8080/"),
            (TIMEOUT_VAR, "5"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let vars = HashMap::from([(API_KEY_VAR, "secret"), (TIMEOUT_VAR, "soon")]);
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: TIMEOUT_VAR, .. }));
    }
}
