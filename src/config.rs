use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub session: SessionConfig,
    pub verification: VerificationConfig,
    pub email: EmailConfig,
    pub login_rate_limit: LoginRateLimitConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Session lifetime from login, in days.
    pub ttl_days: i64,
    /// The `Secure` cookie flag. Disable only for local development over plain HTTP.
    pub cookie_secure: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VerificationConfig {
    /// Verification token lifetime, in hours.
    pub token_ttl_hours: i64,
    /// Frontend URL the emailed verification link points at; the token is
    /// appended as a `token` query parameter.
    pub verify_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    pub from_name: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoginRateLimitConfig {
    /// Failed attempts per IP tolerated inside the trailing window before
    /// further logins are rejected.
    pub max_failed_attempts: i64,
    /// Length of the sliding window, in minutes.
    pub window_minutes: i64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/gallery_db".to_string(),
            max_connections: 16,
            min_connections: 4,
            acquire_timeout: 5,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
            allow_credentials: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: 30,
            cookie_secure: true,
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: 24,
            verify_url: "http://localhost:5173/verify".to_string(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "noreply@promptgallery.dev".to_string(),
            from_name: "PromptGallery".to_string(),
            // On by default: a deployment that forgets to configure SMTP
            // should fail registrations loudly, not skip verification mail.
            enabled: true,
        }
    }
}

impl Default for LoginRateLimitConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            window_minutes: 15,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            cors: CorsConfig::default(),
            session: SessionConfig::default(),
            verification: VerificationConfig::default(),
            email: EmailConfig::default(),
            login_rate_limit: LoginRateLimitConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Gallery.toml (base configuration file)
    /// 2. Environment variables (prefixed with GALLERY_)
    /// 3. DATABASE_URL environment variable (for backwards compatibility)
    pub fn load() -> Result<Self, figment::Error> {
        let figment = Figment::new()
            // Start with defaults
            .merge(Toml::string(&toml::to_string(&Config::default()).unwrap()).nested())
            // Layer on Gallery.toml if it exists
            .merge(Toml::file("Gallery.toml").nested())
            // Layer on environment variables (e.g., GALLERY_DATABASE_URL)
            .merge(Env::prefixed("GALLERY_").split("_"))
            // Special case: DATABASE_URL for backwards compatibility
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()));

        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_constants() {
        let config = Config::default();
        assert_eq!(config.session.ttl_days, 30);
        assert!(config.session.cookie_secure);
        assert_eq!(config.verification.token_ttl_hours, 24);
        assert_eq!(config.login_rate_limit.max_failed_attempts, 5);
        assert_eq!(config.login_rate_limit.window_minutes, 15);
        assert!(config.email.enabled, "verification mail is dispatched unless explicitly disabled");
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let serialized = toml::to_string(&Config::default()).expect("serializable defaults");
        let parsed: Config = toml::from_str(&serialized).expect("parseable defaults");
        assert_eq!(parsed.database.max_connections, 16);
        assert_eq!(parsed.email.smtp_port, 587);
    }
}
