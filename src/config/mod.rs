use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub security: SecurityConfig,
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// How long a successfully decoded token is cached, in seconds
    pub token_cache_ttl_secs: u64,
}

/// What to do when a new or updated session's date range overlaps an
/// existing active session of the same institute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Log a warning and allow the write (overlapping summer sessions etc.)
    Warn,
    /// Reject the write with a conflict error
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub overlap_policy: OverlapPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("JWT_SECRET") {
            if !v.is_empty() {
                self.security.jwt_secret = v;
            }
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("TOKEN_CACHE_TTL_SECS") {
            self.security.token_cache_ttl_secs =
                v.parse().unwrap_or(self.security.token_cache_ttl_secs);
        }
        if let Ok(v) = env::var("SESSIONS_OVERLAP_POLICY") {
            self.sessions.overlap_policy = match v.to_lowercase().as_str() {
                "reject" => OverlapPolicy::Reject,
                "warn" => OverlapPolicy::Warn,
                _ => self.sessions.overlap_policy,
            };
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            security: SecurityConfig {
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                token_cache_ttl_secs: 60,
            },
            sessions: SessionConfig {
                overlap_policy: OverlapPolicy::Warn,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 24,
                token_cache_ttl_secs: 60,
            },
            sessions: SessionConfig {
                overlap_policy: OverlapPolicy::Warn,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 4,
                token_cache_ttl_secs: 60,
            },
            sessions: SessionConfig {
                overlap_policy: OverlapPolicy::Warn,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
