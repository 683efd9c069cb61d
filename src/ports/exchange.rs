use thiserror::Error;

use crate::domain::Satoshis;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("{0} credentials are not configured")]
    NotConfigured(&'static str),
    #[error("failed to sign the request")]
    SigningError,
    #[error("failed to reach the exchange API")]
    ReqwestError,
    #[error("exchange rejected the credentials: {0}")]
    AuthenticationError(String),
    #[error("exchange API error {code}: {msg}")]
    ApiError { code: i64, msg: String },
    #[error("exchange API returned HTTP {0}")]
    HttpStatus(u16),
    #[error("exchange response has an unexpected format")]
    DataFormatError,
}

/// Read-only view of an exchange account. Implementations must never trade or withdraw.
#[async_trait::async_trait]
pub trait ExchangeAccount: Send + Sync {
    fn exchange_name(&self) -> &'static str;

    /// Whether credentials are present. Unconfigured accounts are skipped without any request.
    fn is_configured(&self) -> bool;

    /// Free BTC on the spot wallet.
    async fn fetch_btc_balance(&self) -> error_stack::Result<Satoshis, ExchangeError>;
}
