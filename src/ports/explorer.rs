use thiserror::Error;

use crate::domain::Satoshis;

#[derive(Error, Debug)]
pub enum FetchBalanceError {
    #[error("failed to reach the block explorer")]
    ReqwestError,
    #[error("block explorer returned HTTP {0}")]
    HttpStatus(u16),
    #[error("block explorer response is not a satoshi count")]
    DataFormatError,
}

#[async_trait::async_trait]
pub trait AddressExplorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Confirmed balance of a single address.
    async fn fetch_balance(&self, address: &str)
        -> error_stack::Result<Satoshis, FetchBalanceError>;
}
