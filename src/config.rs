use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Which store backs meals and users.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DbConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub url_ttl_secs: u64,
    pub max_upload_bytes: usize,
    pub public_base_url: Option<String>,
}

impl MediaConfig {
    pub fn url_ttl(&self) -> Duration {
        Duration::from_secs(self.url_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub db: DbConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match env_or("STORE", "postgres").as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .context("DATABASE_URL is required when STORE=postgres")?,
            },
            "memory" => StoreBackend::Memory,
            other => anyhow::bail!("unknown STORE backend: {other}"),
        };

        let db = DbConfig {
            max_connections: parsed_or("DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout_secs: parsed_or("DB_ACQUIRE_TIMEOUT_SECS", 15)?,
        };

        let media = MediaConfig {
            endpoint: env_or("MINIO_ENDPOINT", "http://localhost:9000"),
            bucket: env_or("MINIO_BUCKET", "campus-chef-media"),
            access_key: env_or("MINIO_ACCESS_KEY", "minioadmin"),
            secret_key: env_or("MINIO_SECRET_KEY", "minioadmin"),
            region: env_or("MINIO_REGION", "us-east-1"),
            url_ttl_secs: parsed_or("MEDIA_URL_TTL_SECS", 3600)?,
            max_upload_bytes: parsed_or("UPLOAD_MAX_BYTES", 10 * 1024 * 1024)?,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
        };

        Ok(Self {
            host: env_or("APP_HOST", "0.0.0.0"),
            port: parsed_or("APP_PORT", 8080)?,
            store,
            db,
            media,
        })
    }

    /// Configuration for tests: memory store, fake media settings.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            store: StoreBackend::Memory,
            db: DbConfig {
                max_connections: 1,
                acquire_timeout_secs: 1,
            },
            media: MediaConfig {
                endpoint: "fake".into(),
                bucket: "fake".into(),
                access_key: "fake".into(),
                secret_key: "fake".into(),
                region: "us-east-1".into(),
                url_ttl_secs: 600,
                max_upload_bytes: 1024 * 1024,
                public_base_url: None,
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_or_falls_back_to_default_when_unset() {
        let v: u32 = parsed_or("CAMPUS_CHEF_TEST_SURELY_UNSET", 42).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn in_memory_config_uses_memory_store() {
        let cfg = AppConfig::in_memory();
        assert_eq!(cfg.store, StoreBackend::Memory);
        assert_eq!(cfg.db.acquire_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.media.url_ttl(), Duration::from_secs(600));
    }
}
