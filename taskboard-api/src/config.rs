/// Configuration management for the API server
///
/// Configuration is read once at startup from environment variables (a
/// `.env` file is honoured in development) into a typed [`Config`].
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 5500)
/// - `DATABASE_URL` or `DB_URI`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Token signing secret, at least 32 characters (required)
/// - `JWT_EXPIRES_IN`: Token lifetime in seconds (default: 86400)
/// - `CORS_ORIGINS`: Comma-separated origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::{bail, Context};
use std::env;
use std::str::FromStr;
use taskboard_shared::auth::jwt::JwtConfig;
use taskboard_shared::db::pool::DatabaseConfig;

pub const DEFAULT_PORT: u16 = 5500;
pub const DEFAULT_JWT_EXPIRES_IN_SECS: i64 = 86_400;
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database pool settings
    pub database: DatabaseConfig,

    /// Token signing settings
    pub jwt: JwtConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (HSTS on)
    pub production: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(v) => v.trim().parse::<u16>().context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let database_url = var("DATABASE_URL")
            .or_else(|| var("DB_URI"))
            .context("DATABASE_URL environment variable is required")?;

        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => 10,
        };
        if max_connections == 0 {
            bail!("DATABASE_MAX_CONNECTIONS must be greater than 0");
        }

        let jwt_secret = var("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LENGTH);
        }

        let expires_in = match var("JWT_EXPIRES_IN") {
            Some(v) => v
                .trim()
                .parse::<i64>()
                .context("JWT_EXPIRES_IN must be a number of seconds")?,
            None => DEFAULT_JWT_EXPIRES_IN_SECS,
        };
        if expires_in <= 0 {
            bail!("JWT_EXPIRES_IN must be greater than 0");
        }

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let production = match var("PRODUCTION") {
            Some(v) => parse_bool(&v).context("PRODUCTION must be true or false")?,
            None => false,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                max_connections,
                ..DatabaseConfig::from_url(database_url)
            },
            jwt: JwtConfig::new(jwt_secret, chrono::Duration::seconds(expires_in)),
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("invalid boolean '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5500");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.expires_in, chrono::Duration::days(1));
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(!config.api.production);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("API_HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DB_URI", "postgresql://localhost/alias"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRES_IN", "3600"),
            ("CORS_ORIGINS", "http://localhost:5173, https://app.example.com"),
            ("PRODUCTION", "true"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.database.url, "postgresql://localhost/alias");
        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.jwt.expires_in, chrono::Duration::hours(1));
        assert_eq!(
            config.api.cors_origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
        assert!(config.api.production);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_database_url_wins_over_alias() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/primary"),
            ("DB_URI", "postgresql://localhost/alias"),
            ("JWT_SECRET", SECRET),
        ])
        .unwrap();

        assert_eq!(config.database.url, "postgresql://localhost/primary");
    }

    #[test]
    fn test_missing_required_values() {
        let err = load(&[("JWT_SECRET", SECRET)]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = load(&[("DATABASE_URL", "postgresql://localhost/test")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let base = [
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ];
        let with = |extra: (&'static str, &'static str)| {
            let mut vars = base.to_vec();
            vars.push(extra);
            load(&vars)
        };

        assert!(with(("JWT_SECRET", "too-short")).is_err());
        assert!(with(("JWT_EXPIRES_IN", "0")).is_err());
        assert!(with(("JWT_EXPIRES_IN", "1d")).is_err());
        assert!(with(("PORT", "not-a-port")).is_err());
        assert!(with(("DATABASE_MAX_CONNECTIONS", "0")).is_err());
        assert!(with(("LOG_FORMAT", "xml")).is_err());
        assert!(with(("PRODUCTION", "maybe")).is_err());
    }
}
