//! Client configuration read from the environment.

use std::time::Duration;

use crate::error::ConfigError;
use crate::toast::{ToastBus, DEFAULT_TOAST_LIFETIME};
use crate::validation::DEFAULT_CLEAR_DELAY;

pub const API_URL_VAR: &str = "SALON_API_URL";
pub const ERROR_CLEAR_MS_VAR: &str = "SALON_ERROR_CLEAR_MS";
pub const TOAST_MS_VAR: &str = "SALON_TOAST_MS";
pub const ADMIN_USER_VAR: &str = "SALON_ADMIN_USER";
pub const ADMIN_PASSWORD_VAR: &str = "SALON_ADMIN_PASSWORD";

/// Master login of the admin area. A placeholder check, not authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl AdminCredentials {
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub error_clear_delay: Duration,
    pub toast_lifetime: Duration,
    pub admin_credentials: AdminCredentials,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            error_clear_delay: DEFAULT_CLEAR_DELAY,
            toast_lifetime: DEFAULT_TOAST_LIFETIME,
            admin_credentials: AdminCredentials::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from `lookup`, falling back to defaults for unset
    /// variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty(API_URL_VAR));
            }
            config.api_base_url = url.to_string();
        }

        if let Some(delay) = millis(&lookup, ERROR_CLEAR_MS_VAR)? {
            config.error_clear_delay = delay;
        }
        if let Some(lifetime) = millis(&lookup, TOAST_MS_VAR)? {
            config.toast_lifetime = lifetime;
        }

        if let Some(username) = lookup(ADMIN_USER_VAR) {
            if username.is_empty() {
                return Err(ConfigError::Empty(ADMIN_USER_VAR));
            }
            config.admin_credentials.username = username;
        }

        if let Some(password) = lookup(ADMIN_PASSWORD_VAR) {
            if password.is_empty() {
                return Err(ConfigError::Empty(ADMIN_PASSWORD_VAR));
            }
            config.admin_credentials.password = password;
        }

        tracing::debug!(
            api = %config.api_base_url,
            clear_delay = ?config.error_clear_delay,
            toast_lifetime = ?config.toast_lifetime,
            "config loaded"
        );
        Ok(config)
    }

    /// A fresh bus whose toasts live for `toast_lifetime`.
    pub fn toast_bus(&self) -> ToastBus {
        ToastBus::with_lifetime(self.toast_lifetime)
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: raw.clone(),
        })?;
    Ok(Some(Duration::from_millis(value)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.error_clear_delay, Duration::from_millis(3000));
        assert!(config.admin_credentials.matches("admin", "admin123"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "http://salon.test/api/"),
            (ERROR_CLEAR_MS_VAR, "1500"),
            (TOAST_MS_VAR, "8000"),
            (ADMIN_USER_VAR, "dona"),
            (ADMIN_PASSWORD_VAR, "s3nha"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://salon.test/api/");
        assert_eq!(config.error_clear_delay, Duration::from_millis(1500));
        assert_eq!(config.toast_lifetime, Duration::from_millis(8000));
        assert!(config.admin_credentials.matches("dona", "s3nha"));
        assert!(!config.admin_credentials.matches("admin", "admin123"));
    }

    #[test]
    fn bad_delay_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[(ERROR_CLEAR_MS_VAR, "3s")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: ERROR_CLEAR_MS_VAR,
                value: "3s".to_string()
            }
        );
    }

    #[test]
    fn blank_url_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty(API_URL_VAR));
    }

    #[test]
    fn very_long_delays_are_kept_whole() {
        let max = u64::MAX.to_string();
        let config = ClientConfig::from_lookup(lookup(&[
            (ERROR_CLEAR_MS_VAR, max.as_str()),
            (TOAST_MS_VAR, max.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.error_clear_delay, Duration::from_millis(u64::MAX));
        assert_eq!(config.toast_lifetime, Duration::from_millis(u64::MAX));
    }

    #[test]
    fn toast_bus_uses_configured_lifetime() {
        let config = ClientConfig::from_lookup(lookup(&[(TOAST_MS_VAR, "250")])).unwrap();
        assert_eq!(config.toast_bus().lifetime(), Duration::from_millis(250));
    }

    #[test]
    fn bad_toast_lifetime_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[(TOAST_MS_VAR, "-1")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: TOAST_MS_VAR,
                value: "-1".to_string()
            }
        );
    }
}
