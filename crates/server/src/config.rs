use log::{info, warn};
use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

const DEFAULT_SESSION_TTL_MINUTES: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where rooms, bookings and logins are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Postgres { database_url: String },
    /// Seeded demo data held in process
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store: StoreKind,
    pub run_migrations: bool,
    pub secure_cookies: bool,
    pub session_ttl: Duration,
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            info!("Loaded environment from .env");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = match lookup("STORE").as_deref().unwrap_or("postgres") {
            "postgres" => StoreKind::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "memory" => {
                warn!("Using the in-memory demo store; data is lost on restart");
                StoreKind::Memory
            }
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORE",
                    value: other.to_string(),
                    reason: "expected \"postgres\" or \"memory\"".to_string(),
                });
            }
        };

        let ttl_minutes: u64 =
            parse_or(&lookup, "SESSION_TTL_MINUTES", DEFAULT_SESSION_TTL_MINUTES)?;
        let session_ttl = ttl_minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::Invalid {
                key: "SESSION_TTL_MINUTES",
                value: ttl_minutes.to_string(),
                reason: "too large".to_string(),
            })?;

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            store,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
            secure_cookies: parse_or(&lookup, "SECURE_COOKIES", false)?,
            session_ttl,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/rooms")]).unwrap();

        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(
            config.store,
            StoreKind::Postgres {
                database_url: "postgres://localhost/rooms".to_string()
            }
        );
        assert!(config.run_migrations);
        assert!(!config.secure_cookies);
        assert_eq!(config.session_ttl, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert_eq!(config(&[]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_memory_store_and_overrides() {
        let config = config(&[
            ("STORE", "memory"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("SECURE_COOKIES", "true"),
            ("SESSION_TTL_MINUTES", "5"),
        ])
        .unwrap();

        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.secure_cookies);
        assert_eq!(config.session_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("STORE", "mysql")]),
            Err(ConfigError::Invalid { key: "STORE", .. })
        ));
        assert!(matches!(
            config(&[("STORE", "memory"), ("RUN_MIGRATIONS", "sometimes")]),
            Err(ConfigError::Invalid { key: "RUN_MIGRATIONS", .. })
        ));
        assert!(matches!(
            config(&[("STORE", "memory"), ("SESSION_TTL_MINUTES", "18446744073709551615")]),
            Err(ConfigError::Invalid { key: "SESSION_TTL_MINUTES", .. })
        ));
    }
}
