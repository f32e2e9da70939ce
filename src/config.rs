use std::fmt::Display;
use std::io::{Error as IoError, ErrorKind};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    /// Left unset when `DATABASE_URL` is missing; requests report the
    /// connection failure instead of the server refusing to start.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> DatabaseConfig {
        DatabaseConfig {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, IoError> {
        Config::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Config, IoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let acquire_timeout_secs = parse_var(&var, "DATABASE_ACQUIRE_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS);

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: parse_var(&var, "PORT")?.unwrap_or(DEFAULT_PORT),
            database: DatabaseConfig {
                url: var("DATABASE_URL").filter(|url| !url.is_empty()),
                max_connections: parse_var(&var, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS),
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            },
        })
    }
}

fn parse_var<F, T>(var: &F, name: &str) -> Result<Option<T>, IoError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match var(name) {
        Some(value) => value.parse().map(Some).map_err(|err| {
            IoError::new(
                ErrorKind::InvalidInput,
                format!("invalid value {:?} for {}: {}", value, name, err),
            )
        }),
        None => Ok(None),
    }
}
