use crate::cache::TtlCache;
use crate::convert::validate_code;
use crate::error::{FetchError, Result};
use crate::price_provider::CryptoPriceProvider;
use crate::providers::util::{http_client, request_error};
use crate::symbols::{SymbolResolver, SymbolSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Fixed cache key for the full coin directory.
const DIRECTORY_CACHE_KEY: &str = "coingecko:coins:list";

// CoinDirectory: the dynamic tier of symbol resolution
pub struct CoinDirectory {
    base_url: String,
    cache: Arc<TtlCache<String, Arc<HashMap<String, String>>>>,
    ttl: Duration,
    timeout: Duration,
}

impl CoinDirectory {
    pub fn new(
        base_url: &str,
        cache: Arc<TtlCache<String, Arc<HashMap<String, String>>>>,
        ttl: Duration,
        timeout: Duration,
    ) -> Self {
        CoinDirectory {
            base_url: base_url.to_string(),
            cache,
            ttl,
            timeout,
        }
    }

    /// Cached symbol -> identifier mapping, refetched once per TTL window.
    async fn directory(&self) -> Result<Arc<HashMap<String, String>>> {
        let key = DIRECTORY_CACHE_KEY.to_string();
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = format!("{}/coins/list", self.base_url);
        debug!("Requesting coin directory from {}", url);

        let client = http_client(self.timeout)?;
        let response = client.get(&url).send().await.map_err(request_error)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "coin directory request returned HTTP {}",
                response.status()
            )));
        }

        let text = response.text().await.map_err(request_error)?;
        let entries: Vec<CoinListEntry> = match serde_json::from_str(&text) {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = ?e, "Failed to parse coin directory response");
                return Err(FetchError::UpstreamUnavailable(format!(
                    "failed to parse coin directory response: {e}"
                )));
            }
        };

        // Upstream list order reflects the provider's own ranking, so the
        // first occurrence of a duplicated symbol is the canonical coin.
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            map.entry(entry.symbol.to_lowercase()).or_insert(entry.id);
        }

        let directory = Arc::new(map);
        debug!("Built coin directory with {} symbols", directory.len());
        self.cache
            .put(key, Arc::clone(&directory), self.ttl)
            .await;
        Ok(directory)
    }
}

#[derive(Debug, Deserialize)]
struct CoinListEntry {
    id: String,
    symbol: String,
}

#[async_trait]
impl SymbolSource for CoinDirectory {
    async fn lookup(&self, symbol: &str) -> Result<Option<String>> {
        let directory = self.directory().await?;
        Ok(directory.get(&symbol.to_lowercase()).cloned())
    }
}

// CoinGeckoProvider implementation for CryptoPriceProvider
pub struct CoinGeckoProvider {
    base_url: String,
    cache: Arc<TtlCache<String, f64>>,
    resolver: Arc<SymbolResolver>,
    ttl: Duration,
    timeout: Duration,
}

impl CoinGeckoProvider {
    pub fn new(
        base_url: &str,
        cache: Arc<TtlCache<String, f64>>,
        resolver: Arc<SymbolResolver>,
        ttl: Duration,
        timeout: Duration,
    ) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
            cache,
            resolver,
            ttl,
            timeout,
        }
    }
}

#[async_trait]
impl CryptoPriceProvider for CoinGeckoProvider {
    #[instrument(
        name = "CryptoPriceFetch",
        skip(self),
        fields(symbol = %symbol, vs = %vs_currency)
    )]
    async fn get_price(&self, symbol: &str, vs_currency: &str) -> Result<f64> {
        validate_code(symbol)?;
        validate_code(vs_currency)?;
        let vs = vs_currency.to_lowercase();

        let id = self.resolver.resolve(symbol).await?;

        let key = format!("crypto:{id}:{vs}");
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url, id, vs
        );
        debug!("Requesting price from {}", url);

        let client = http_client(self.timeout)?;
        let response = client.get(&url).send().await.map_err(request_error)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "price request for {} returned HTTP {}",
                id,
                response.status()
            )));
        }

        let text = response.text().await.map_err(request_error)?;
        let data: HashMap<String, HashMap<String, f64>> =
            serde_json::from_str(&text).map_err(|e| {
                FetchError::UpstreamUnavailable(format!(
                    "failed to parse price response for {id}: {e}"
                ))
            })?;

        // The identifier came from the provider's own directory; a response
        // without it is a partial payload, not an unknown currency.
        let quotes = data.get(&id).ok_or_else(|| {
            FetchError::UpstreamUnavailable(format!("price response missing entry for {id}"))
        })?;
        let price = *quotes
            .get(&vs)
            .ok_or_else(|| FetchError::CurrencyNotFound(vs.clone()))?;

        self.cache.put(key, price, self.ttl).await;
        Ok(price)
    }
}
