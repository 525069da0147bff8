/*
 * Responsibility
 * - Load settings from environment variables (.env supported)
 *   (DATABASE_URL, CORS allow-list, identity provider / JWKS settings)
 * - Validate them (missing or malformed values fail startup)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthConfig,
}

/// Identity provider settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub audience: String,
    pub issuer: String,
    pub jwks_url: String,
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,

    pub jwks_cache_ttl: Duration,
    pub jwks_fetch_timeout: Duration,
    pub jwks_min_refresh_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (the environment in production, a map in tests).
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match var("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        // Heroku-style URLs use the `postgres://` scheme.
        let database_url = match database_url.strip_prefix("postgres://") {
            Some(rest) => format!("postgresql://{rest}"),
            None => database_url,
        };

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth = AuthConfig::from_lookup(&var)?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth,
        })
    }
}

impl AuthConfig {
    fn from_lookup(var: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let domain = var("AUTH0_DOMAIN")
            .map(|d| d.trim().trim_end_matches('/').to_string())
            .filter(|d| !d.is_empty())
            .ok_or(ConfigError::Missing("AUTH0_DOMAIN"))?;

        let audience = var("API_AUDIENCE")
            .filter(|a| !a.trim().is_empty())
            .ok_or(ConfigError::Missing("API_AUDIENCE"))?;

        let issuer = var("AUTH_ISSUER").unwrap_or_else(|| format!("https://{domain}/"));

        let jwks_url = var("AUTH_JWKS_URL")
            .unwrap_or_else(|| format!("https://{domain}/.well-known/jwks.json"));
        url::Url::parse(&jwks_url).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?;

        let algorithms = parse_algorithms(var("AUTH_ALGORITHMS").as_deref().unwrap_or("RS256"))?;

        Ok(Self {
            audience,
            issuer,
            jwks_url,
            algorithms,
            leeway_seconds: parse_u64(var, "AUTH_LEEWAY_SECONDS", 0)?,
            jwks_cache_ttl: Duration::from_secs(parse_u64(var, "JWKS_CACHE_TTL_SECONDS", 600)?),
            jwks_fetch_timeout: Duration::from_secs(parse_u64(
                var,
                "JWKS_FETCH_TIMEOUT_SECONDS",
                5,
            )?),
            jwks_min_refresh_interval: Duration::from_secs(parse_u64(
                var,
                "JWKS_MIN_REFRESH_INTERVAL_SECONDS",
                0,
            )?),
        })
    }
}

fn parse_u64(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match var(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_algorithms(value: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Algorithm::from_str(s).map_err(|_| ConfigError::Invalid("AUTH_ALGORITHMS")))
        .collect::<Result<Vec<_>, _>>()?;

    let symmetric = algorithms
        .iter()
        .any(|a| matches!(a, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512));

    if algorithms.is_empty() || symmetric {
        return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
    }

    Ok(algorithms)
}
