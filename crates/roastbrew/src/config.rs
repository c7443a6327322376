//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROASTBREW_HOST` - Bind address (default: 127.0.0.1)
//! - `ROASTBREW_PORT` / `PORT` - Listen port (default: 57935)
//! - `ORDER_ID_PREFIX` - Prefix of generated order numbers (default: RAB)
//! - `SHIPPING_FEE` - Flat shipping surcharge per order (default: 50.00)
//! - `STATUS_TRANSITIONS` - `permissive` (default) or `strict` (forward-only)
//! - `FRONTEND_URL` - Storefront base URL used in email links
//! - `STORE_EMAIL` - Inbox that receives contact-form copies
//! - `MAIL_FROM` - Sender mailbox for outgoing mail
//! - `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_USERNAME`, `SMTP_PASSWORD` - SMTP relay;
//!   when `SMTP_HOST` is unset, mail is written to the log instead
//! - `MAIL_TIMEOUT_SECS` - Per-message send timeout (default: 10)
//! - `MAIL_MAX_ATTEMPTS` - Attempts per queued notification (default: 3)
//! - `MAIL_RETRY_BASE_MS` - First retry delay, doubled per attempt (default: 500)
//! - `MAIL_QUEUE_CAPACITY` - Pending notifications before enqueue fails (default: 256)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use crate::model::StatusPolicy;

pub const DEFAULT_PORT: u16 = 57935;
pub const DEFAULT_STORE_EMAIL: &str = "roast.brew.brewery@gmail.com";
pub const DEFAULT_MAIL_FROM: &str = "Roast & Brew Brewery <roast.brew.brewery@gmail.com>";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:57935";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub orders: OrderConfig,
    pub mail: MailConfig,
}

/// Order numbering and pricing rules.
#[derive(Debug, Clone)]
pub struct OrderConfig {
    pub id_prefix: String,
    pub shipping_fee: Decimal,
    pub status_policy: StatusPolicy,
}

/// Outgoing mail settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from_address: String,
    pub store_email: String,
    pub frontend_url: String,
    pub send_timeout: Duration,
    pub max_attempts: u32,
    pub retry_base: Duration,
    pub queue_capacity: usize,
    /// `None` means no relay is configured and mail is only logged.
    pub smtp: Option<SmtpConfig>,
}

/// SMTP relay credentials.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            orders: OrderConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            id_prefix: "RAB".to_string(),
            shipping_fee: Decimal::new(5000, 2),
            status_policy: StatusPolicy::Permissive,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: DEFAULT_MAIL_FROM.to_string(),
            store_email: DEFAULT_STORE_EMAIL.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            send_timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_base: Duration::from_millis(500),
            queue_capacity: 256,
            smtp: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` first so a `.env` file in the working
    /// directory is honoured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed, or if the
    /// SMTP settings are only partially provided.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let defaults = AppConfig::default();

        let host = env.parse_or("ROASTBREW_HOST", defaults.host)?;
        let port = match env.optional("ROASTBREW_PORT") {
            Some(_) => env.parse_or("ROASTBREW_PORT", defaults.port)?,
            None => env.parse_or("PORT", defaults.port)?,
        };

        let orders = OrderConfig {
            id_prefix: env.or_default("ORDER_ID_PREFIX", &defaults.orders.id_prefix),
            shipping_fee: env.parse_or("SHIPPING_FEE", defaults.orders.shipping_fee)?,
            status_policy: env.parse_or("STATUS_TRANSITIONS", defaults.orders.status_policy)?,
        };
        if orders.shipping_fee.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "SHIPPING_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let mail = MailConfig {
            from_address: env.or_default("MAIL_FROM", &defaults.mail.from_address),
            store_email: env.or_default("STORE_EMAIL", &defaults.mail.store_email),
            frontend_url: env
                .or_default("FRONTEND_URL", &defaults.mail.frontend_url)
                .trim_end_matches('/')
                .to_string(),
            send_timeout: Duration::from_secs(env.parse_or("MAIL_TIMEOUT_SECS", 10u64)?),
            max_attempts: env.parse_or("MAIL_MAX_ATTEMPTS", defaults.mail.max_attempts)?.max(1),
            retry_base: Duration::from_millis(env.parse_or("MAIL_RETRY_BASE_MS", 500u64)?),
            queue_capacity: env.parse_or("MAIL_QUEUE_CAPACITY", defaults.mail.queue_capacity)?.max(1),
            smtp: SmtpConfig::from_env(&env)?,
        };

        Ok(Self {
            host,
            port,
            orders,
            mail,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SmtpConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Option<Self>, ConfigError> {
        let Some(host) = env.optional("SMTP_HOST") else {
            return Ok(None);
        };
        Ok(Some(Self {
            host,
            port: env.parse_or("SMTP_PORT", 587u16)?,
            username: env.required("SMTP_USERNAME")?,
            password: SecretString::from(env.required("SMTP_PASSWORD")?),
        }))
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional environment variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.orders.id_prefix, "RAB");
        assert_eq!(config.orders.shipping_fee, Decimal::new(50, 0));
        assert_eq!(config.orders.status_policy, StatusPolicy::Permissive);
        assert!(config.mail.smtp.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("PORT", "8080"),
            ("STATUS_TRANSITIONS", "strict"),
            ("SHIPPING_FEE", "75.50"),
            ("FRONTEND_URL", "https://shop.example/"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.orders.status_policy, StatusPolicy::Strict);
        assert_eq!(config.orders.shipping_fee, Decimal::new(7550, 2));
        assert_eq!(config.mail.frontend_url, "https://shop.example");
    }

    #[test]
    fn service_port_wins_over_generic_port() {
        let config = load(&[("PORT", "8080"), ("ROASTBREW_PORT", "9090")]).unwrap();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            load(&[("ROASTBREW_PORT", "eighty")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "ROASTBREW_PORT"
        ));
        assert!(matches!(
            load(&[("STATUS_TRANSITIONS", "sideways")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "STATUS_TRANSITIONS"
        ));
        assert!(matches!(
            load(&[("SHIPPING_FEE", "-1")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "SHIPPING_FEE"
        ));
    }

    #[test]
    fn partial_smtp_settings_are_an_error() {
        assert!(matches!(
            load(&[("SMTP_HOST", "smtp.example.com")]),
            Err(ConfigError::MissingEnvVar(key)) if key == "SMTP_USERNAME"
        ));
    }

    #[test]
    fn smtp_password_is_redacted() {
        let config = load(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "brewer"),
            ("SMTP_PASSWORD", "hunter2-hops"),
        ])
        .unwrap();
        let smtp = config.mail.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        assert!(!format!("{smtp:?}").contains("hunter2"));
    }
}
