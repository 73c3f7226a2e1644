//! Environment-driven server configuration.

use thiserror::Error;
use worklog_db::DbConfig;
use worklog_tracker::TrackerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Full server configuration.
///
/// | Variable | Default |
/// |---|---|
/// | `APP_PORT` | required |
/// | `APP_ENV` | `local` |
/// | `DB_URL` | `127.0.0.1:8000` |
/// | `DB_NAMESPACE` | `worklog` |
/// | `DB_NAME` | `main` |
/// | `DB_USER` / `DB_PASS` | `root` / `root` |
/// | `PASSPORT_API_HOST` | required |
/// | `PASSPORT_API_TIMEOUT_SECS` | `10` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Deployment environment; `prod` switches logging to JSON.
    pub env: String,
    pub db: DbConfig,
    pub tracker: TrackerConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let port = parse(&get, "APP_PORT")?.ok_or(ConfigError::Missing("APP_PORT"))?;
        let env = get("APP_ENV").unwrap_or_else(|| "local".into());

        let mut tracker = TrackerConfig {
            passport_api_host: get("PASSPORT_API_HOST")
                .ok_or(ConfigError::Missing("PASSPORT_API_HOST"))?,
            ..Default::default()
        };
        if let Some(secs) = parse(&get, "PASSPORT_API_TIMEOUT_SECS")? {
            tracker.request_timeout_secs = secs;
        }

        Ok(Self {
            port,
            env,
            db: db_config_from_lookup(&get),
            tracker,
        })
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("prod")
    }
}

/// Database settings alone, for tools that never reach the HTTP side.
pub fn db_config_from_env() -> DbConfig {
    db_config_from_lookup(&|var: &str| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
}

fn db_config_from_lookup(get: &impl Fn(&str) -> Option<String>) -> DbConfig {
    let defaults = DbConfig::default();
    DbConfig {
        url: get("DB_URL").unwrap_or(defaults.url),
        namespace: get("DB_NAMESPACE").unwrap_or(defaults.namespace),
        database: get("DB_NAME").unwrap_or(defaults.database),
        username: get("DB_USER").unwrap_or(defaults.username),
        password: get("DB_PASS").unwrap_or(defaults.password),
    }
}

fn parse<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { var, value })
        })
        .transpose()
}
