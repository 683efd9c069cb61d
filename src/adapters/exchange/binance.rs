use std::fmt;

use chrono::Utc;
use error_stack::{report, Result, ResultExt};
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use sha2::Sha256;
use tracing::instrument;

use crate::domain::Satoshis;
use crate::ports::exchange::{ExchangeAccount, ExchangeError};

type HmacSha256 = Hmac<Sha256>;

pub const BINANCE_API_URL: &str = "https://api.binance.com";
const ACCOUNT_ENDPOINT: &str = "/api/v3/account";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const RECV_WINDOW_MS: u64 = 5000;
const BTC_ASSET: &str = "BTC";
const EXCHANGE_NAME: &str = "Binance";

// Binance error codes for a bad key, a bad signature or missing permissions.
const AUTH_ERROR_CODES: [i64; 3] = [-1022, -2014, -2015];

#[derive(Debug, serde::Deserialize)]
struct AccountResponse {
    balances: Vec<AssetBalance>,
}

#[derive(Debug, serde::Deserialize)]
struct AssetBalance {
    asset: String,
    free: String,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    code: i64,
    msg: String,
}

/// Read-only client for the spot account snapshot of a Binance account.
#[derive(Clone)]
pub struct BinanceSpotAccount {
    client: reqwest::Client,
    base_url: String,
    api_key: Box<str>,
    secret_key: Box<str>,
}

impl fmt::Debug for BinanceSpotAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceSpotAccount")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl BinanceSpotAccount {
    pub fn new(client: reqwest::Client, api_key: &str, secret_key: &str) -> Self {
        Self::with_base_url(client, BINANCE_API_URL, api_key, secret_key)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: &str,
        secret_key: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.trim().into(),
            secret_key: secret_key.trim().into(),
        }
    }
}

fn account_query(timestamp_ms: i64) -> String {
    format!("timestamp={timestamp_ms}&recvWindow={RECV_WINDOW_MS}")
}

/// Lowercase hex HMAC-SHA256 of the exact query string, keyed by the API secret.
pub fn sign_query(secret_key: &str, query: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|_| report!(ExchangeError::SigningError))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn parse_account_response(status: StatusCode, body: &str) -> Result<Satoshis, ExchangeError> {
    if !status.is_success() {
        let api_error = serde_json::from_str::<ApiErrorResponse>(body).ok();
        let context = match api_error {
            Some(error) if AUTH_ERROR_CODES.contains(&error.code) => {
                ExchangeError::AuthenticationError(error.msg)
            }
            _ if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                ExchangeError::AuthenticationError(format!("HTTP {}", status.as_u16()))
            }
            Some(error) => ExchangeError::ApiError {
                code: error.code,
                msg: error.msg,
            },
            None => ExchangeError::HttpStatus(status.as_u16()),
        };
        return Err(report!(context).attach_printable(format!("Response: {body}")));
    }

    let account: AccountResponse = serde_json::from_str(body)
        .change_context(ExchangeError::DataFormatError)
        .attach_printable("Failed to parse account response as json")?;

    match account.balances.iter().find(|balance| balance.asset == BTC_ASSET) {
        Some(balance) => balance
            .free
            .parse::<Satoshis>()
            .change_context(ExchangeError::DataFormatError)
            .attach_printable_lazy(|| format!("Free BTC was not a decimal: {}", balance.free)),
        None => Ok(Satoshis::ZERO),
    }
}

#[async_trait::async_trait]
impl ExchangeAccount for BinanceSpotAccount {
    fn exchange_name(&self) -> &'static str {
        EXCHANGE_NAME
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }

    #[instrument(skip(self), name = "Binance::fetch_btc_balance")]
    async fn fetch_btc_balance(&self) -> Result<Satoshis, ExchangeError> {
        if !self.is_configured() {
            return Err(report!(ExchangeError::NotConfigured(EXCHANGE_NAME)));
        }

        let query = account_query(Utc::now().timestamp_millis());
        let signature = sign_query(&self.secret_key, &query)?;
        let endpoint = format!("{}{ACCOUNT_ENDPOINT}", self.base_url);

        let response = self
            .client
            .get(format!("{endpoint}?{query}&signature={signature}"))
            .header(API_KEY_HEADER, self.api_key.as_ref())
            .send()
            .await
            .change_context(ExchangeError::ReqwestError)
            .attach_printable("Failed to make GET request")
            .attach_printable_lazy(|| format!("URL: {endpoint}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .change_context(ExchangeError::ReqwestError)
            .attach_printable("Failed to get response text")
            .attach_printable_lazy(|| format!("URL: {endpoint}"))?;

        parse_account_response(status, &body)
    }
}
