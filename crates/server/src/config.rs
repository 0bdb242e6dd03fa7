use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment after `.env` is loaded
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub bind_addr: SocketAddr,
    pub database_max_connections: u32,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let bind_addr = match lookup("BIND_ADDR") {
            Some(value) => parse("BIND_ADDR", value)?,
            None => parse("BIND_ADDR", DEFAULT_BIND_ADDR.to_string())?,
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse("DATABASE_MAX_CONNECTIONS", value)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS") {
            Some(value) => parse_flag("RUN_MIGRATIONS", value)?,
            None => true,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            bind_addr,
            database_max_connections,
            run_migrations,
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/registrar"),
        ("OIDC_ISSUER_URL", "https://idp.example.edu"),
    ];

    #[test]
    fn test_defaults() {
        let config = config_from(&REQUIRED).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/registrar");
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.database_max_connections, 20);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_MAX_CONNECTIONS", "5"),
            ("RUN_MIGRATIONS", "off"),
        ]);
        let config = config_from(&pairs).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.database_max_connections, 5);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_missing_required() {
        let err = config_from(&[("DATABASE_URL", "postgres://localhost/registrar")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("OIDC_ISSUER_URL"));
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABASE_MAX_CONNECTIONS", "lots"));
        assert!(matches!(
            config_from(&pairs),
            Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                ..
            })
        ));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RUN_MIGRATIONS", "maybe"));
        assert!(matches!(
            config_from(&pairs),
            Err(ConfigError::Invalid {
                key: "RUN_MIGRATIONS",
                ..
            })
        ));
    }
}
