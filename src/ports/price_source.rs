use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("failed to reach the price API")]
    ReqwestError,
    #[error("price API returned HTTP {0}")]
    HttpStatus(u16),
    #[error("price API response has an unexpected format")]
    DataFormatError,
    #[error("BTC price must be a positive number, got {0}")]
    InvalidPrice(f64),
}

/// A live BTC → USD quote provider.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_usd_price(&self) -> error_stack::Result<f64, PriceError>;
}
