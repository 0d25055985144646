use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FiatProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub fiat: Option<FiatProviderConfig>,
    pub coingecko: Option<CoinGeckoProviderConfig>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            fiat: Some(FiatProviderConfig {
                base_url: "https://open.er-api.com/v6".to_string(),
            }),
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: "https://api.coingecko.com/api/v3".to_string(),
            }),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    /// TTL for cached pair rates and unit prices
    pub rate_ttl_secs: u64,
    /// TTL for the full coin directory
    pub directory_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            rate_ttl_secs: 900,
            directory_ttl_secs: 86400,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Extra symbol -> identifier entries merged over the seed table
    #[serde(default)]
    pub symbols: HashMap<String, String>,
}

impl AppConfig {
    /// Loads from the default path; a missing file means default settings.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxgate", "fxgate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn fiat_base_url(&self) -> &str {
        self.providers
            .fiat
            .as_ref()
            .map_or("https://open.er-api.com/v6", |p| &p.base_url)
    }

    pub fn coingecko_base_url(&self) -> &str {
        self.providers
            .coingecko
            .as_ref()
            .map_or("https://api.coingecko.com/api/v3", |p| &p.base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.timeout_secs)
    }

    pub fn rate_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.rate_ttl_secs)
    }

    pub fn directory_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.directory_ttl_secs)
    }
}
