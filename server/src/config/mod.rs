use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Server configuration loaded from environment variables (and `.env`).
///
/// | Env Var                    | Default        |
/// |----------------------------|----------------|
/// | `DATABASE_URL`             | unset          |
/// | `HOST`                     | `0.0.0.0`      |
/// | `PORT`                     | `3001`         |
/// | `DATABASE_MAX_CONNECTIONS` | `5`            |
///
/// Without `DATABASE_URL` the server runs against the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            host: parse_or("HOST", lookup("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: parse_or("PORT", lookup("PORT"), DEFAULT_PORT),
            max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                lookup("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            ),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    match raw {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Config: invalid value '{}' for {}, using default", raw, key);
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, None);
        assert_eq!(config.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 3001)));
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/tickets"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
        ]);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/tickets"));
        assert_eq!(config.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.max_connections, 20);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "not-a-port"), ("DATABASE_URL", "  ")]);
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_url, None);
    }
}
