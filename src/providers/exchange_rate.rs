use crate::cache::TtlCache;
use crate::convert::validate_code;
use crate::error::{FetchError, Result};
use crate::providers::util::{http_client, request_error};
use crate::rate_provider::FiatRateProvider;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fiat rates from the ExchangeRate-API open endpoint.
///
/// One upstream call fetches the full rate table for a base currency; the
/// extracted pair rate is cached so repeated conversions inside the TTL
/// window stay local.
pub struct ExchangeRateApiProvider {
    base_url: String,
    cache: Arc<TtlCache<String, f64>>,
    ttl: Duration,
    timeout: Duration,
}

impl ExchangeRateApiProvider {
    pub fn new(
        base_url: &str,
        cache: Arc<TtlCache<String, f64>>,
        ttl: Duration,
        timeout: Duration,
    ) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.to_string(),
            cache,
            ttl,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl FiatRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "FiatRateFetch", skip(self), fields(from = %from, to = %to))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        validate_code(from)?;
        validate_code(to)?;
        let from = from.to_uppercase();
        let to = to.to_uppercase();

        // Identity pair needs no upstream data
        if from == to {
            return Ok(1.0);
        }

        let key = format!("fiat:{from}:{to}");
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = format!("{}/latest/{}", self.base_url, from);
        debug!("Requesting rate table from {}", url);

        let client = http_client(self.timeout)?;
        let response = client.get(&url).send().await.map_err(request_error)?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "fiat provider returned HTTP {} for base currency {}",
                response.status(),
                from
            )));
        }

        let text = response.text().await.map_err(request_error)?;
        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::UpstreamUnavailable(format!(
                "failed to parse fiat rate response for {from}: {e}"
            ))
        })?;

        if data.result != "success" {
            return Err(FetchError::UpstreamUnavailable(format!(
                "fiat provider reported '{}' for base currency {}",
                data.error_type.as_deref().unwrap_or("unknown error"),
                from
            )));
        }

        if data.rates.is_empty() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "fiat provider returned no rates table for base currency {from}"
            )));
        }

        let rate = *data
            .rates
            .get(&to)
            .ok_or_else(|| FetchError::CurrencyNotFound(to.clone()))?;

        self.cache.put(key, rate, self.ttl).await;
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RATE_TTL: Duration = Duration::from_secs(900);
    const TIMEOUT: Duration = Duration::from_secs(5);

    fn provider(base_url: &str) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(base_url, Arc::new(TtlCache::new()), RATE_TTL, TIMEOUT)
    }

    async fn mount_latest(server: &MockServer, base: &str, body: &str, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/latest/{base}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    const USD_TABLE: &str = r#"{
        "result": "success",
        "rates": {"USD": 1.0, "EUR": 0.92, "GBP": 0.79}
    }"#;

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "USD", USD_TABLE, 1).await;

        let provider = provider(&mock_server.uri());
        let rate = provider.get_rate("USD", "EUR").await.unwrap();
        assert_eq!(rate, 0.92);
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let mock_server = MockServer::start().await;
        // expect(1) fails the test if the second call reaches upstream
        mount_latest(&mock_server, "USD", USD_TABLE, 1).await;

        let provider = provider(&mock_server.uri());
        assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 0.92);
        assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 0.92);
    }

    #[tokio::test]
    async fn test_lowercase_codes_are_normalized() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "USD", USD_TABLE, 1).await;

        let provider = provider(&mock_server.uri());
        assert_eq!(provider.get_rate("usd", "eur").await.unwrap(), 0.92);
    }

    #[tokio::test]
    async fn test_identity_pair_short_circuits() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "USD", USD_TABLE, 0).await;

        let provider = provider(&mock_server.uri());
        let rate = provider.get_rate("USD", "usd").await.unwrap();
        assert_eq!(rate, 1.0);
    }

    #[tokio::test]
    async fn test_unknown_target_currency() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "USD", USD_TABLE, 1).await;

        let provider = provider(&mock_server.uri());
        let err = provider.get_rate("USD", "ZZZ").await.unwrap_err();
        match err {
            FetchError::CurrencyNotFound(code) => assert_eq!(code, "ZZZ"),
            other => panic!("expected CurrencyNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upstream_error_result() {
        let mock_server = MockServer::start().await;
        let body = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        mount_latest(&mock_server, "XXX", body, 1).await;

        let provider = provider(&mock_server.uri());
        let err = provider.get_rate("XXX", "EUR").await.unwrap_err();
        match err {
            FetchError::UpstreamUnavailable(msg) => assert!(msg.contains("unsupported-code")),
            other => panic!("expected UpstreamUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upstream_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/USD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = provider(&mock_server.uri());
        let err = provider.get_rate("USD", "EUR").await.unwrap_err();
        assert!(matches!(err, FetchError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "USD", "not json at all", 1).await;

        let provider = provider(&mock_server.uri());
        let err = provider.get_rate("USD", "EUR").await.unwrap_err();
        assert!(matches!(err, FetchError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_invalid_code_rejected_before_any_call() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "US1", USD_TABLE, 0).await;

        let provider = provider(&mock_server.uri());
        let err = provider.get_rate("US1", "EUR").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_unmodified() {
        let mock_server = MockServer::start().await;
        let provider = provider(&mock_server.uri());

        // First attempt: upstream down
        Mock::given(method("GET"))
            .and(path("/latest/USD"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&mock_server)
            .await;
        assert!(provider.get_rate("USD", "EUR").await.is_err());
        mock_server.reset().await;

        // Recovery is observed immediately, nothing negative was cached
        mount_latest(&mock_server, "USD", USD_TABLE, 1).await;
        assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 0.92);
    }
}
