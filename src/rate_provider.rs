//! Provides fiat currency rate resolution for the service.

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait FiatRateProvider: Send + Sync {
    /// Multiplicative factor such that `amount_in_to = amount_in_from * rate`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}
