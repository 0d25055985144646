//! Two-tier crypto symbol resolution.
//!
//! A symbol like "BTC" has to become a pricing-provider identifier like
//! "bitcoin" before a price can be fetched. Resolution tries an ordered
//! list of [`SymbolSource`] strategies: the compiled-in seed table first,
//! then the cached coin directory ([`crate::providers::coingecko::CoinDirectory`]).

use crate::error::{FetchError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Common symbols mapped to CoinGecko identifiers. Consulted before the
/// dynamic directory, so these never cost a network call.
pub const SEED_SYMBOLS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("USDT", "tether"),
    ("BNB", "binancecoin"),
    ("ADA", "cardano"),
    ("SOL", "solana"),
    ("DOGE", "dogecoin"),
    ("XRP", "ripple"),
    ("DOT", "polkadot"),
    ("LTC", "litecoin"),
    ("USDC", "usd-coin"),
    ("DAI", "dai"),
    ("TRX", "tron"),
    ("SHIB", "shiba-inu"),
    ("AVAX", "avalanche-2"),
    ("LINK", "chainlink"),
    ("UNI", "uniswap"),
    ("BCH", "bitcoin-cash"),
    ("MATIC", "polygon"),
    ("HBAR", "hedera-hashgraph"),
];

/// One resolution strategy. `Ok(None)` means "not known here", which is
/// distinct from a failed lookup.
#[async_trait]
pub trait SymbolSource: Send + Sync {
    async fn lookup(&self, symbol: &str) -> Result<Option<String>>;
}

/// Tier one: the in-process seed table, optionally extended from config.
pub struct StaticSymbols {
    map: HashMap<String, String>,
}

impl StaticSymbols {
    pub fn new() -> Self {
        Self::with_overrides(&HashMap::new())
    }

    /// Seed table merged with config-supplied entries; overrides win on
    /// collision. Keys are stored uppercase.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map: HashMap<String, String> = SEED_SYMBOLS
            .iter()
            .map(|(symbol, id)| (symbol.to_string(), id.to_string()))
            .collect();
        for (symbol, id) in overrides {
            map.insert(symbol.to_uppercase(), id.clone());
        }
        Self { map }
    }
}

impl Default for StaticSymbols {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SymbolSource for StaticSymbols {
    async fn lookup(&self, symbol: &str) -> Result<Option<String>> {
        Ok(self.map.get(&symbol.to_uppercase()).cloned())
    }
}

/// Tries each source in order; the first identifier wins.
pub struct SymbolResolver {
    sources: Vec<Box<dyn SymbolSource>>,
}

impl SymbolResolver {
    pub fn new(sources: Vec<Box<dyn SymbolSource>>) -> Self {
        Self { sources }
    }

    /// Fails with [`FetchError::SymbolNotFound`] only after every source
    /// has answered `None`; source errors propagate unchanged.
    pub async fn resolve(&self, symbol: &str) -> Result<String> {
        for source in &self.sources {
            if let Some(id) = source.lookup(symbol).await? {
                return Ok(id);
            }
        }
        Err(FetchError::SymbolNotFound(symbol.to_uppercase()))
    }
}
