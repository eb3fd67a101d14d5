use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::error::StartupError;

pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub redis_url: String,
    pub collection: String,
}

impl Config {
    pub fn load() -> Result<Self, StartupError> {
        Ok(Self {
            port: try_load("RUST_PORT", "8080")?,
            store: try_load("RUST_STORE", "redis")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            collection: try_load("RUST_COLLECTION", "formulaire")?,
        })
    }
}

/// Backend holding the submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreKind::Redis),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store `{other}`, expected `redis` or `memory`")),
        }
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, StartupError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, StartupError>
where
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| StartupError::Config {
        key,
        reason: e.to_string(),
    })
}
