// src/config.rs
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PORT: u16 = 5432;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub listen_addr: SocketAddr,
}

impl DatabaseConfig {
    /// `DB_HOST` may carry an explicit port (`db.internal:5433`, `[::1]:5433`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let raw_host = required("DB_HOST")?;
        let (host, port) = split_host_port(&raw_host).ok_or_else(|| ConfigError::Invalid {
            name: "DB_HOST",
            value: raw_host.clone(),
        })?;

        Ok(Self {
            user: required("DB_USER")?,
            // An empty password is legitimate for trust-authenticated setups.
            password: lookup("DB_PASS").unwrap_or_default(),
            host,
            port,
            name: required("DB_NAME")?,
        })
    }
}

/// Accepts `host`, `host:port`, a bare IPv6 literal, or `[v6]:port`.
fn split_host_port(raw: &str) -> Option<(String, u16)> {
    if let Some(rest) = raw.strip_prefix('[') {
        let (addr, tail) = rest.split_once(']')?;
        addr.parse::<Ipv6Addr>().ok()?;
        let port = match tail {
            "" => DEFAULT_DB_PORT,
            _ => tail.strip_prefix(':')?.parse().ok()?,
        };
        return Some((addr.to_string(), port));
    }

    if raw.parse::<Ipv6Addr>().is_ok() {
        return Some((raw.to_string(), DEFAULT_DB_PORT));
    }

    match raw.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => Some((host.to_string(), port.parse().ok()?)),
        Some(_) => None,
        None => Some((raw.to_string(), DEFAULT_DB_PORT)),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database = DatabaseConfig::from_lookup(&lookup)?;

        let host = match lookup("HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::Invalid { name: "HOST", value })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database,
            listen_addr: SocketAddr::from((host, port)),
        })
    }
}
