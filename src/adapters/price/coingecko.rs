use std::collections::HashMap;

use error_stack::{report, Result, ResultExt};
use tracing::instrument;

use crate::ports::price_source::{PriceError, PriceSource};

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
const BITCOIN_ID: &str = "bitcoin";

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct PriceResponse {
    pub usd: Option<f64>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct PricesResponse(pub HashMap<String, PriceResponse>);

#[derive(Debug, Clone)]
pub struct CoinGeckoApi {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, COINGECKO_API_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn simple_price_url(&self) -> String {
        format!(
            "{}/simple/price?ids={BITCOIN_ID}&vs_currencies=usd",
            self.base_url
        )
    }
}

fn parse_bitcoin_usd(body: &str) -> Result<f64, PriceError> {
    let prices: PricesResponse = serde_json::from_str(body)
        .change_context(PriceError::DataFormatError)
        .attach_printable("Failed to parse price response as json")
        .attach_printable_lazy(|| format!("Response: {body}"))?;

    prices
        .0
        .get(BITCOIN_ID)
        .and_then(|price| price.usd)
        .ok_or_else(|| report!(PriceError::DataFormatError))
        .attach_printable_lazy(|| format!("No USD price for '{BITCOIN_ID}' in response: {body}"))
}

#[async_trait::async_trait]
impl PriceSource for CoinGeckoApi {
    fn name(&self) -> &'static str {
        "CoinGecko"
    }

    #[instrument(skip(self), name = "CoinGecko::fetch_usd_price")]
    async fn fetch_usd_price(&self) -> Result<f64, PriceError> {
        let url = self.simple_price_url();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .change_context(PriceError::ReqwestError)
            .attach_printable("Failed to make GET request")
            .attach_printable_lazy(|| format!("URL: {url}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .change_context(PriceError::ReqwestError)
            .attach_printable("Failed to get response text")
            .attach_printable_lazy(|| format!("URL: {url}"))?;

        if !status.is_success() {
            return Err(report!(PriceError::HttpStatus(status.as_u16()))
                .attach_printable(format!("URL: {url}"))
                .attach_printable(format!("Response: {body}")));
        }

        parse_bitcoin_usd(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::canned::{serve_once, unreachable_url};

    #[test]
    fn test_parse_bitcoin_usd() {
        let price = parse_bitcoin_usd(r#"{"bitcoin":{"usd":95123.45}}"#).unwrap();
        assert_eq!(price, 95123.45);
    }

    #[test]
    fn test_parse_missing_price() {
        let report = parse_bitcoin_usd(r#"{"bitcoin":{}}"#).unwrap_err();
        assert!(matches!(
            report.current_context(),
            PriceError::DataFormatError
        ));

        let report = parse_bitcoin_usd(r#"{"ethereum":{"usd":3000}}"#).unwrap_err();
        assert!(matches!(
            report.current_context(),
            PriceError::DataFormatError
        ));
    }

    #[test]
    fn test_parse_garbage() {
        let report = parse_bitcoin_usd("<html>rate limited</html>").unwrap_err();
        assert!(matches!(
            report.current_context(),
            PriceError::DataFormatError
        ));
    }

    #[test]
    fn test_simple_price_url() {
        let api = CoinGeckoApi::with_base_url(reqwest::Client::new(), "http://localhost:1");
        assert_eq!(
            api.simple_price_url(),
            "http://localhost:1/simple/price?ids=bitcoin&vs_currencies=usd"
        );
    }

    #[tokio::test]
    async fn test_fetch_usd_price_from_server() {
        let (base_url, server) = serve_once(200, r#"{"bitcoin":{"usd":95000}}"#).await;
        let api = CoinGeckoApi::with_base_url(reqwest::Client::new(), base_url);

        assert_eq!(api.fetch_usd_price().await.unwrap(), 95_000.0);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /simple/price?ids=bitcoin&vs_currencies=usd HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_fetch_usd_price_rate_limited() {
        let (base_url, server) = serve_once(429, r#"{"status":{"error_code":429}}"#).await;
        let api = CoinGeckoApi::with_base_url(reqwest::Client::new(), base_url);

        let report = api.fetch_usd_price().await.unwrap_err();

        assert!(matches!(
            report.current_context(),
            PriceError::HttpStatus(429)
        ));
        assert_eq!(
            report.current_context().to_string(),
            "price API returned HTTP 429"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_usd_price_unreachable() {
        let api = CoinGeckoApi::with_base_url(reqwest::Client::new(), unreachable_url().await);

        let report = api.fetch_usd_price().await.unwrap_err();

        assert!(matches!(
            report.current_context(),
            PriceError::ReqwestError
        ));
    }
}
