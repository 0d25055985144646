//! Crypto pricing abstraction consumed by the HTTP layer.

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CryptoPriceProvider: Send + Sync {
    /// Price of one unit of `symbol` expressed in `vs_currency`.
    async fn get_price(&self, symbol: &str, vs_currency: &str) -> Result<f64>;
}
