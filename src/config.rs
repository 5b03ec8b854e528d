// config.rs
// Service configuration read from the environment (after dotenvy loads .env).

use std::{env, net::SocketAddr, str::FromStr, time::Duration};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ISSUER: &str = "totpfactor";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_ATTEMPT_WINDOW_SECS: u64 = 300; // 5 minutes

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Issuer label shown in authenticator apps.
    pub issuer: String,
    /// Burst of verification attempts per account; one more returns every `attempt_window`.
    pub max_attempts: u32,
    pub attempt_window: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            issuer: DEFAULT_ISSUER.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_window: Duration::from_secs(DEFAULT_ATTEMPT_WINDOW_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: parse_var("TOTP_BIND_ADDR", defaults.bind_addr),
            issuer: env::var("TOTP_ISSUER")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.issuer),
            max_attempts: parse_var("TOTP_MAX_ATTEMPTS", defaults.max_attempts).max(1),
            attempt_window: Duration::from_secs(
                parse_var("TOTP_ATTEMPT_WINDOW_SECS", DEFAULT_ATTEMPT_WINDOW_SECS).max(1),
            ),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    parse_value(name, env::var(name).ok(), default)
}

fn parse_value<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, fallback = %default, "invalid config value");
            default
        }),
        None => default,
    }
}
