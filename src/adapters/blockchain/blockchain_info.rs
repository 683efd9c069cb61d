use error_stack::{report, Result, ResultExt};
use tracing::instrument;

use crate::domain::Satoshis;
use crate::ports::explorer::{AddressExplorer, FetchBalanceError};

pub const BLOCKCHAIN_INFO_URL: &str = "https://blockchain.info";
/// Only count funds buried under this many blocks.
const MIN_CONFIRMATIONS: u32 = 6;

/// blockchain.info "simple query" API: `/q/addressbalance` answers with a bare satoshi count.
#[derive(Debug, Clone)]
pub struct BlockchainInfoExplorer {
    client: reqwest::Client,
    base_url: String,
}

impl BlockchainInfoExplorer {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, BLOCKCHAIN_INFO_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn address_balance_url(&self, address: &str) -> String {
        format!(
            "{}/q/addressbalance/{address}?confirmations={MIN_CONFIRMATIONS}",
            self.base_url
        )
    }
}

fn parse_satoshis(body: &str) -> Result<Satoshis, FetchBalanceError> {
    let satoshis = body
        .trim()
        .parse::<u64>()
        .change_context(FetchBalanceError::DataFormatError)
        .attach_printable_lazy(|| format!("Result was not a satoshi count! Result: {body}"))?;
    Ok(Satoshis(satoshis))
}

#[async_trait::async_trait]
impl AddressExplorer for BlockchainInfoExplorer {
    fn name(&self) -> &'static str {
        "blockchain.info"
    }

    #[instrument(skip(self), name = "BlockchainInfo::fetch_balance")]
    async fn fetch_balance(&self, address: &str) -> Result<Satoshis, FetchBalanceError> {
        let url = self.address_balance_url(address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .change_context(FetchBalanceError::ReqwestError)
            .attach_printable("Failed to make GET request")
            .attach_printable_lazy(|| format!("URL: {url}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .change_context(FetchBalanceError::ReqwestError)
            .attach_printable("Failed to get response text")
            .attach_printable_lazy(|| format!("URL: {url}"))?;

        if !status.is_success() {
            return Err(report!(FetchBalanceError::HttpStatus(status.as_u16()))
                .attach_printable(format!("URL: {url}"))
                .attach_printable(format!("Response: {}", body.trim())));
        }

        parse_satoshis(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::canned::{serve_once, unreachable_url};

    #[test]
    fn test_parse_satoshis() {
        assert_eq!(parse_satoshis("10000000").unwrap(), Satoshis(10_000_000));
        assert_eq!(parse_satoshis("0\n").unwrap(), Satoshis::ZERO);
    }

    #[test]
    fn test_parse_rejects_error_bodies() {
        for body in ["Checksum does not validate", "", "-5", "1.5"] {
            let report = parse_satoshis(body).unwrap_err();
            assert!(matches!(
                report.current_context(),
                FetchBalanceError::DataFormatError
            ));
        }
    }

    #[test]
    fn test_address_balance_url() {
        let explorer = BlockchainInfoExplorer::new(reqwest::Client::new());
        assert_eq!(
            explorer.address_balance_url("bc1qexample"),
            "https://blockchain.info/q/addressbalance/bc1qexample?confirmations=6"
        );
    }

    #[tokio::test]
    async fn test_fetch_balance_from_server() {
        let (base_url, server) = serve_once(200, "10000000").await;
        let explorer = BlockchainInfoExplorer::with_base_url(reqwest::Client::new(), base_url);

        let balance = explorer.fetch_balance("bc1qa").await.unwrap();

        assert_eq!(balance, Satoshis(10_000_000));
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /q/addressbalance/bc1qa?confirmations=6 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_fetch_balance_http_error() {
        let (base_url, server) = serve_once(500, "Internal Server Error").await;
        let explorer = BlockchainInfoExplorer::with_base_url(reqwest::Client::new(), base_url);

        let report = explorer.fetch_balance("bc1qa").await.unwrap_err();

        assert!(matches!(
            report.current_context(),
            FetchBalanceError::HttpStatus(500)
        ));
        assert_eq!(
            report.current_context().to_string(),
            "block explorer returned HTTP 500"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_balance_unreachable() {
        let explorer =
            BlockchainInfoExplorer::with_base_url(reqwest::Client::new(), unreachable_url().await);

        let report = explorer.fetch_balance("bc1qa").await.unwrap_err();

        assert!(matches!(
            report.current_context(),
            FetchBalanceError::ReqwestError
        ));
    }
}
