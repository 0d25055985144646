use crate::error::FetchError;
use std::time::Duration;

/// Builds the request client used for a single upstream call.
///
/// Every call carries an explicit timeout; nothing in the service blocks
/// longer than this.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(concat!("fxgate/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::Internal(format!("failed to build http client: {e}")))
}

/// Folds a transport failure into the error taxonomy. Timeouts are kept
/// distinct so the HTTP layer can answer 504 instead of 502.
pub(crate) fn request_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::UpstreamTimeout
    } else {
        FetchError::UpstreamUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_builds() {
        assert!(http_client(Duration::from_secs(5)).is_ok());
    }
}
