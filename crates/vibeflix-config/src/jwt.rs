use std::env;

const DEFAULT_SECRET: &str = "default-secret-key-change-in-production";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of a session token in seconds.
    pub session_expiry: i64,
    /// Token age in seconds after which a request re-issues the session cookie.
    pub refresh_after: i64,
    /// Marks the session cookie `Secure`; on for production deployments.
    pub secure_cookies: bool,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET is not set, falling back to the development secret");
            DEFAULT_SECRET.to_string()
        });

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Self {
            secret,
            session_expiry: env::var("SESSION_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(604800), // 7 days
            refresh_after: env::var("SESSION_REFRESH_AFTER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86400), // 1 day
            secure_cookies: app_env.eq_ignore_ascii_case("production"),
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            session_expiry: 604800,
            refresh_after: 86400,
            secure_cookies: false,
        }
    }
}
