//! # FX Client
//!
//! HTTP adapter for the [`RateRepository`] port.
//!
//! Issues `GET <base_url>/<BASE>` and expects a JSON body carrying a `rates`
//! object of numbers. Every failure is mapped onto [`FetchError`].

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use fx_types::{CurrencyCode, FetchError, RateRepository, RateSet};
use reqwest::Client;
use serde::Deserialize;

/// Public provider used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Default bound on a single rate request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_timeout() => {
                FetchError::Network(format!("request timed out: {}", e))
            }
            ClientError::Http(e) => FetchError::Network(e.to_string()),
            ClientError::Api { status, .. } => FetchError::Transport { status },
            ClientError::Json(_) => FetchError::invalid_response(),
            ClientError::Config(msg) => FetchError::Network(msg),
        }
    }
}

/// Connection settings for the rate provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Creates a config for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads configuration from `FX_API_URL` and `FX_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = env::var("FX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout = match env::var("FX_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ClientError::Config(format!("FX_TIMEOUT_SECS must be an integer: {}", raw))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self { base_url, timeout })
    }
}

/// Rate repository backed by a remote HTTP provider.
pub struct HttpRateRepository {
    base_url: String,
    http: Client,
}

impl HttpRateRepository {
    /// Creates a new repository.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be greater than zero".into()));
        }
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn rates_url(&self, base: &CurrencyCode) -> String {
        format!("{}/{}", self.base_url, base)
    }

    async fn get_body(&self, url: &str) -> Result<String, ClientError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait::async_trait]
impl RateRepository for HttpRateRepository {
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateSet, FetchError> {
        let url = self.rates_url(base);
        tracing::debug!(%base, %url, "fetching rates");

        let body = self.get_body(&url).await.map_err(|e| {
            tracing::warn!(%base, error = %e, "rate request failed");
            FetchError::from(e)
        })?;

        let rates = parse_rates_body(base, &body)?;
        tracing::debug!(%base, count = rates.rates().len(), "rates received");
        Ok(rates)
    }
}

/// Body of a provider's latest-rates response. Unknown members are ignored.
#[derive(Debug, Deserialize)]
struct LatestRatesBody {
    rates: BTreeMap<String, f64>,
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// Parses a provider body into a [`RateSet`] for `base`.
///
/// The body must be a JSON object whose `rates` member maps codes to positive
/// numbers. A `base` member, when present, must name the requested base.
pub fn parse_rates_body(base: &CurrencyCode, body: &str) -> Result<RateSet, FetchError> {
    let body: LatestRatesBody = serde_json::from_str(body).map_err(|e| {
        tracing::debug!(error = %e, "unexpected provider body");
        ClientError::from(e)
    })?;

    if let Some(reported) = body.base.as_deref() {
        if !reported.eq_ignore_ascii_case(base.as_str()) {
            return Err(FetchError::Data(format!(
                "Invalid API response structure: asked for {} but got {}",
                base, reported
            )));
        }
    }

    let rates = body
        .rates
        .into_iter()
        .map(|(code, rate)| {
            code.parse::<CurrencyCode>()
                .map(|code| (code, rate))
                .map_err(|_| FetchError::invalid_response())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RateSet::new(base.clone(), rates)?.with_provider_date(body.date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> CurrencyCode {
        "USD".parse().unwrap()
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let repo = HttpRateRepository::new(ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(repo.base_url, "http://localhost:3000");
        assert_eq!(repo.rates_url(&usd()), "http://localhost:3000/USD");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(matches!(
            HttpRateRepository::new(config),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_provider_body() {
        let body = r#"{
            "provider": "https://www.exchangerate-api.com",
            "base": "USD",
            "date": "2024-05-01",
            "rates": { "USD": 1, "EUR": 0.9, "INR": 83.0 }
        }"#;
        let rates = parse_rates_body(&usd(), body).unwrap();
        assert_eq!(rates.base_code(), &usd());
        assert_eq!(rates.rate(&"INR".parse().unwrap()), Some(83.0));
        assert_eq!(rates.provider_date(), Some("2024-05-01"));
        assert_eq!(rates.currencies().len(), 3);
    }

    #[test]
    fn test_body_without_base_or_date() {
        let rates = parse_rates_body(&usd(), r#"{"rates": {"EUR": 0.9}, "base": null}"#).unwrap();
        assert_eq!(rates.provider_date(), None);
        assert_eq!(rates.rate(&"EUR".parse().unwrap()), Some(0.9));
    }

    #[test]
    fn test_missing_rates_is_data_error() {
        let err = parse_rates_body(&usd(), r#"{"result": "error"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Data(_)));
        assert_eq!(err.to_string(), "Invalid API response structure");
    }

    #[test]
    fn test_malformed_rates_are_data_errors() {
        for body in [
            "not json",
            r#"{"rates": [1, 2]}"#,
            r#"{"rates": {"EUR": "0.9"}}"#,
            r#"{"rates": {"EUR": -1}}"#,
            r#"{"base": "EUR", "rates": {"INR": 90.0}}"#,
            r#"{"rates": {"EUR": null}}"#,
            r#"{"rates": {"EUR": 0.9}, "date": 20240501}"#,
        ] {
            let err = parse_rates_body(&usd(), body).unwrap_err();
            assert!(matches!(err, FetchError::Data(_)), "body {body} gave {err:?}");
        }
    }

    #[test]
    fn test_api_error_maps_to_transport() {
        let err = FetchError::from(ClientError::Api {
            status: 404,
            message: "unsupported code".into(),
        });
        assert!(matches!(err, FetchError::Transport { status: 404 }));
    }
}
