use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all threads and services.
/// It is pulled into the application state via FromRef.
#[derive(Clone)]
pub struct AppConfig {
    // Database connection string (SQLite).
    pub db_url: String,
    // Secret used to sign and validate session tokens.
    pub session_secret: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Runtime environment marker. Controls log formatting and secret fallbacks.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (secret fallback, pretty logs) and hardened production settings (mandatory
/// secrets, JSON logs).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows tests to instantiate the configuration without touching the
    /// process environment.
    fn default() -> Self {
        Self {
            db_url: "sqlite::memory:".to_string(),
            session_secret: "super-secure-test-secret-value-local".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables and implements the fail-fast
    /// principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current runtime
    /// environment (especially Production) is not found. This prevents the application
    /// from starting with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // Session secret resolution: mandatory in production, fallback in local.
        let session_secret = match env {
            Env::Production => {
                env::var("SECRET_KEY").expect("FATAL: SECRET_KEY must be set in production.")
            }
            _ => env::var("SECRET_KEY")
                .unwrap_or_else(|_| "super-secure-test-secret-value-local".to_string()),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        match env {
            Env::Local => Self {
                env: Env::Local,
                // The local database defaults to an on-disk SQLite file in the
                // working directory, matching the zero-setup development flow.
                db_url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://posts.db".to_string()),
                session_secret,
                bind_addr,
            },
            Env::Production => Self {
                env: Env::Production,
                db_url: env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod"),
                session_secret,
                bind_addr,
            },
        }
    }
}
