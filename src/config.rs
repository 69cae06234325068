use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::SqliteConnectOptions;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_DATABASE_URL: &str = "sqlite://notes.db";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 2;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database: SqliteConnectOptions,
    pub upload_dir: PathBuf,
    pub proxy_timeout: Duration,
    pub max_upload_bytes: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
    Database(sqlx::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
            ConfigError::Database(e) => write!(f, "invalid DATABASE_URL: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let database = SqliteConnectOptions::from_str(&database_url)
            .map_err(ConfigError::Database)?
            .create_if_missing(true);

        let upload_dir = lookup("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let proxy_timeout = Duration::from_secs(parse_or(
            &lookup,
            "PROXY_TIMEOUT_SECS",
            Some(DEFAULT_PROXY_TIMEOUT_SECS),
        )?);
        let max_upload_bytes = parse_or(
            &lookup,
            "MAX_UPLOAD_BYTES",
            Some(DEFAULT_MAX_UPLOAD_BYTES),
        )?;

        Ok(Config {
            bind_addr,
            database,
            upload_dir,
            proxy_timeout,
            max_upload_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => default.ok_or(ConfigError::Invalid {
            key,
            value: String::new(),
        }),
    }
}
