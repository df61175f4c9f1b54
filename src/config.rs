use std::{env, time::Duration};

use crate::gate::GateConfig;

/// AppConfig
///
/// Holds the front end's entire configuration state. Loaded once at startup and
/// immutable afterwards; handlers and the gate pull it out of `AppState` via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and the cookie `Secure` flag.
    pub env: Env,
    // Base URL of the external backend API (no trailing slash).
    pub backend_url: String,
    // Address the HTTP server binds to.
    pub bind_addr: String,
    // Upper bound for a single backend round trip.
    pub backend_timeout: Duration,
    // Route sets consumed by the request gate.
    pub gate: GateConfig,
}

/// Env
///
/// Defines the runtime context: human-readable logs and plain-HTTP cookies locally,
/// JSON logs and `Secure` cookies in production.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl Default for AppConfig {
    /// Safe, non-panicking values for test state setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            backend_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            gate: GateConfig::default(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables at startup.
    ///
    /// # Panics
    /// Panics if `BACKEND_API_URL` is missing in production, or if a numeric
    /// setting cannot be parsed. The server must not start half-configured.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let backend_url = match env {
            Env::Production => env::var("BACKEND_API_URL")
                .expect("FATAL: BACKEND_API_URL must be set in production."),
            Env::Local => {
                env::var("BACKEND_API_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
            }
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let timeout_secs = match env::var("BACKEND_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .expect("FATAL: BACKEND_TIMEOUT_SECS must be a whole number of seconds."),
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        // Overrides also widen the gate scope to the new routes.
        let defaults = GateConfig::default();
        let protected_prefixes =
            list_var("GATE_PROTECTED_PREFIXES").unwrap_or(defaults.protected_prefixes);
        let public_exact_routes = list_var("GATE_PUBLIC_ROUTES")
            .map(|routes| routes.into_iter().collect())
            .unwrap_or(defaults.public_exact_routes);
        let gate = GateConfig::with_routes(protected_prefixes, public_exact_routes);

        Self {
            env,
            backend_url: backend_url.trim_end_matches('/').to_string(),
            bind_addr,
            backend_timeout: Duration::from_secs(timeout_secs),
            gate,
        }
    }

    /// The session cookie carries `Secure` only in production.
    pub fn cookie_secure(&self) -> bool {
        self.env == Env::Production
    }
}

/// Comma-separated list; blank entries dropped. `None` when unset or empty.
fn list_var(key: &str) -> Option<Vec<String>> {
    let raw = env::var(key).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}
