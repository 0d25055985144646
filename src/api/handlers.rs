//! Request handlers for the conversion endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ApiError;
use crate::cache::TtlCache;
use crate::config::AppConfig;
use crate::convert::{convert, validate_amount};
use crate::price_provider::CryptoPriceProvider;
use crate::providers::coingecko::{CoinDirectory, CoinGeckoProvider};
use crate::providers::exchange_rate::ExchangeRateApiProvider;
use crate::rate_provider::FiatRateProvider;
use crate::symbols::{StaticSymbols, SymbolResolver};

/// Shared application state: the two fetchers behind their trait seams.
#[derive(Clone)]
pub struct AppState {
    pub fiat: Arc<dyn FiatRateProvider>,
    pub crypto: Arc<dyn CryptoPriceProvider>,
}

impl AppState {
    pub fn new(fiat: Arc<dyn FiatRateProvider>, crypto: Arc<dyn CryptoPriceProvider>) -> Self {
        Self { fiat, crypto }
    }

    /// Wires caches, symbol resolution, and providers from configuration.
    /// Each state instance owns independent caches.
    pub fn from_config(config: &AppConfig) -> Self {
        let rate_cache = Arc::new(TtlCache::<String, f64>::new());
        let directory_cache =
            Arc::new(TtlCache::<String, Arc<HashMap<String, String>>>::new());

        let resolver = Arc::new(SymbolResolver::new(vec![
            Box::new(StaticSymbols::with_overrides(&config.symbols)),
            Box::new(CoinDirectory::new(
                config.coingecko_base_url(),
                directory_cache,
                config.directory_ttl(),
                config.request_timeout(),
            )),
        ]));

        let fiat = ExchangeRateApiProvider::new(
            config.fiat_base_url(),
            Arc::clone(&rate_cache),
            config.rate_ttl(),
            config.request_timeout(),
        );
        let crypto = CoinGeckoProvider::new(
            config.coingecko_base_url(),
            rate_cache,
            resolver,
            config.rate_ttl(),
            config.request_timeout(),
        );

        Self::new(Arc::new(fiat), Arc::new(crypto))
    }
}

fn default_amount() -> f64 {
    1.0
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    pub from_currency: String,
    pub to_currency: String,
    #[serde(default = "default_amount")]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub converted_amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct CryptoParams {
    pub symbol: String,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_amount")]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct CryptoResponse {
    pub symbol: String,
    pub vs_currency: String,
    pub amount: f64,
    pub price_per_unit: f64,
    pub converted_amount: f64,
}

/// Presentation-layer rounding; the core never rounds.
fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

/// Handler for GET /convert
pub async fn convert_handler(
    State(state): State<AppState>,
    Query(params): Query<ConvertParams>,
) -> Result<Json<ConvertResponse>, ApiError> {
    validate_amount(params.amount)?;

    let rate = state
        .fiat
        .get_rate(&params.from_currency, &params.to_currency)
        .await?;

    Ok(Json(ConvertResponse {
        from: params.from_currency.to_uppercase(),
        to: params.to_currency.to_uppercase(),
        amount: params.amount,
        rate,
        converted_amount: round8(convert(params.amount, rate)),
    }))
}

/// Handler for GET /crypto
pub async fn crypto_handler(
    State(state): State<AppState>,
    Query(params): Query<CryptoParams>,
) -> Result<Json<CryptoResponse>, ApiError> {
    validate_amount(params.amount)?;

    let price = state
        .crypto
        .get_price(&params.symbol, &params.vs_currency)
        .await?;

    Ok(Json(CryptoResponse {
        symbol: params.symbol.to_uppercase(),
        vs_currency: params.vs_currency.to_lowercase(),
        amount: params.amount,
        price_per_unit: price,
        converted_amount: round8(convert(params.amount, price)),
    }))
}

/// Handler for GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "fxgate currency and crypto conversion service is running."
    }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
