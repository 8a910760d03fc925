//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Directory holding the frontend.
    pub static_dir: PathBuf,
    /// Comma-separated allowed origins; any origin when unset.
    pub cors_allowed_origins: Option<String>,
    /// Requests slower than this are logged at warn.
    pub slow_request: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 10000)),
            database_url: "sqlite:historico_base.db?mode=rwc".to_string(),
            static_dir: PathBuf::from("static"),
            cors_allowed_origins: None,
            slow_request: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `0.0.0.0:10000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:historico_base.db?mode=rwc` |
    /// | `STATIC_DIR` | Frontend directory | `static` |
    /// | `CORS_ALLOWED_ORIGINS` | Allowed origins, comma-separated | (any) |
    /// | `SLOW_REQUEST_SECS` | Slow request log threshold | `5` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let addr = match env::var("API_ADDR") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidAddr(value))?,
            Err(_) => defaults.addr,
        };

        let database_url = env::var("SQLITE_PATH").unwrap_or(defaults.database_url);

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let slow_request = secs_var("SLOW_REQUEST_SECS")?.unwrap_or(defaults.slow_request);

        Ok(Self {
            addr,
            database_url,
            static_dir,
            cors_allowed_origins,
            slow_request,
        })
    }
}

fn secs_var(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format: {0}")]
    InvalidAddr(String),

    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        const VARS: [&str; 3] = ["API_ADDR", "SLOW_REQUEST_SECS", "CORS_ALLOWED_ORIGINS"];
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.port(), 10000);
        assert_eq!(config.slow_request, Duration::from_secs(5));
        assert!(config.cors_allowed_origins.is_none());

        env::set_var("API_ADDR", "127.0.0.1:8080");
        env::set_var("SLOW_REQUEST_SECS", "2");
        env::set_var("CORS_ALLOWED_ORIGINS", "  ");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.slow_request, Duration::from_secs(2));
        assert!(config.cors_allowed_origins.is_none());

        env::set_var("API_ADDR", "not-an-addr");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr(_))));
        env::remove_var("API_ADDR");

        env::set_var("SLOW_REQUEST_SECS", "soon");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidNumber { name: "SLOW_REQUEST_SECS", .. })
        ));

        for var in VARS {
            env::remove_var(var);
        }
    }
}
