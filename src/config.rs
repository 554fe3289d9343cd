use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded,
/// shared across the router, the auth store, and the API client via the
/// unified application state.
#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the platform backend (auth, profile, glucose, linking).
    pub api_base_url: String,
    /// Secret used to decode and validate the platform JWT.
    pub jwt_secret: String,
    /// Socket address the navigation controller binds to.
    pub bind_addr: String,
    /// Runtime environment marker. Controls log formatting and fallbacks.
    pub env: Env,
}

/// Env
///
/// Runtime context. Local development gets pretty logs and permissive
/// defaults; Production demands every secret explicitly and logs JSON.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for test setup, so unit and
    /// integration tests can build application state without touching
    /// environment variables.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            jwt_secret: "super-secure-test-secret-value-local".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical startup configuration loader. Reads everything from
    /// environment variables and fails fast: a missing critical variable in
    /// Production panics before the server can start misconfigured.
    ///
    /// # Panics
    /// Panics in Production when `API_BASE_URL` or `PORTAL_JWT_SECRET` is
    /// unset.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // The production secret is mandatory and must be explicitly set.
        let jwt_secret = match env {
            Env::Production => env::var("PORTAL_JWT_SECRET")
                .expect("FATAL: PORTAL_JWT_SECRET must be set in production."),
            _ => env::var("PORTAL_JWT_SECRET")
                .unwrap_or_else(|_| "super-secure-test-secret-value-local".to_string()),
        };

        let api_base_url = match env {
            Env::Production => {
                env::var("API_BASE_URL").expect("FATAL: API_BASE_URL required in prod")
            }
            _ => env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
        };

        Self {
            api_base_url,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            env,
        }
    }
}
