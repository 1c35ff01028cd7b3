use std::collections::HashMap;
use std::fmt;

use axum::http::Method;
use chrono::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];
/// Placeholder signing key. Never use outside local development.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";
pub const JWT_EXPIRES_IN: &str = "1d";

/// Source of configuration values. Lets tests resolve from a plain map
/// instead of the process environment.
pub trait Environment {
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment.
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Listening port as read from `PORT`. Text that is not a valid port number
/// is kept as-is rather than corrected; binding is what rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Port {
    Number(u16),
    NotANumber(String),
}

impl Port {
    pub fn number(&self) -> Option<u16> {
        match self {
            Port::Number(port) => Some(*port),
            Port::NotANumber(_) => None,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Number(port) => write!(f, "{}", port),
            Port::NotANumber(raw) => write!(f, "NaN ({:?})", raw),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub port: Port,
    /// Externally reachable URL of this service.
    pub base_url: String,
    /// Allowed CORS origins, in configured order.
    pub cors_origins: Vec<String>,
    pub cors_methods: Vec<Method>,
    pub credentials_allowed: bool,
    pub jwt_secret: String,
    pub jwt_secret_is_default: bool,
    pub jwt_expires_in: String,
}

impl EffectiveConfig {
    /// Reads `.env` if present, then resolves from the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        resolve(&ProcessEnv)
    }

    pub fn warn_if_insecure(&self) {
        if self.jwt_secret_is_default {
            tracing::warn!(
                "JWT_SECRET is not set, signing tokens with the built-in placeholder secret"
            );
        }
    }

    /// Token lifetime. Falls back to one day if `jwt_expires_in` is unreadable.
    pub fn jwt_expiry(&self) -> Duration {
        parse_expiry(&self.jwt_expires_in).unwrap_or_else(|| Duration::days(1))
    }
}

/// Builds the effective configuration from `env`. Unset and empty variables
/// both fall back to the defaults; no value is otherwise validated.
pub fn resolve<E: Environment + ?Sized>(env: &E) -> EffectiveConfig {
    let var = |key: &str| env.get(key).filter(|v| !v.is_empty());

    let port = match var("PORT") {
        Some(raw) => match raw.trim().parse::<u16>() {
            Ok(port) => Port::Number(port),
            Err(_) => Port::NotANumber(raw),
        },
        None => Port::Number(DEFAULT_PORT),
    };

    let base_url = var("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let cors_origins = match var("CORS_ORIGINS") {
        Some(raw) => split_origins(&raw),
        None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
    };

    let (jwt_secret, jwt_secret_is_default) = match var("JWT_SECRET") {
        Some(secret) => (secret, false),
        None => (DEFAULT_JWT_SECRET.to_string(), true),
    };

    EffectiveConfig {
        port,
        base_url,
        cors_origins,
        cors_methods: vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ],
        credentials_allowed: true,
        jwt_secret,
        jwt_secret_is_default,
        jwt_expires_in: JWT_EXPIRES_IN.to_string(),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Parses lifetimes like `30s`, `15m`, `12h`, `1d`. A bare number is seconds.
pub fn parse_expiry(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: i64 = digits.parse().ok()?;

    match unit {
        "" | "s" => Some(Duration::seconds(amount)),
        "m" => Some(Duration::minutes(amount)),
        "h" => Some(Duration::hours(amount)),
        "d" => Some(Duration::days(amount)),
        _ => None,
    }
}
