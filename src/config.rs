// src/config.rs
use std::net::SocketAddr;
use std::time::Duration;

use crate::map::MapProvider;

pub const DEFAULT_VIEW: &str = "constructions_view";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Connection details for the hosted backend (REST + auth share one base URL).
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub view: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub provider: MapProvider,
    pub mapbox_token: Option<String>,
    pub load_attempts: u32,
    pub center: (f64, f64),
    pub zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            provider: MapProvider::Leaflet,
            mapbox_token: None,
            load_attempts: 3,
            center: (-27.2423, -49.6401),
            zoom: 9.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub map: MapConfig,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    /// Absolute origin used when the auth service has to send users back here.
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        url::Url::parse(&url).map_err(|e| ConfigError::Invalid {
            key: "SUPABASE_URL",
            reason: e.to_string(),
        })?;
        let anon_key = get("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let timeout_secs: u64 = parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), 30)?;

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            reason: format!("{e}"),
        })?;

        let max_workers: usize = parse_or("MAX_WORKERS", get("MAX_WORKERS"), 8)?;
        if max_workers == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_WORKERS",
                reason: "must be at least 1".into(),
            });
        }

        let provider = match get("MAP_PROVIDER") {
            Some(raw) => raw.parse::<MapProvider>().map_err(|reason| ConfigError::Invalid {
                key: "MAP_PROVIDER",
                reason,
            })?,
            None => MapProvider::Leaflet,
        };

        let load_attempts: u32 = parse_or("MAP_LOAD_ATTEMPTS", get("MAP_LOAD_ATTEMPTS"), 3)?;

        let public_base_url = get("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://{bind_addr}"))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            backend: BackendConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
                view: get("CONSTRUCTIONS_VIEW").unwrap_or_else(|| DEFAULT_VIEW.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            map: MapConfig {
                provider,
                mapbox_token: get("MAPBOX_TOKEN"),
                load_attempts: load_attempts.max(1),
                ..MapConfig::default()
            },
            bind_addr,
            max_workers,
            public_base_url,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
