use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::info;

use crate::adapters::{
    blockchain::blockchain_info::BlockchainInfoExplorer, exchange::binance::BinanceSpotAccount,
    http::build_http_client, price::coingecko::CoinGeckoApi,
};
use crate::application::{report::render_config, tracker::BtcTracker};
use crate::config::{AppConfig, ConfigStore, SetupPrompter};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("configuration is unavailable")]
    Configuration,
    #[error("failed to build the HTTP client")]
    HttpClient,
    #[error("balance report failed")]
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Dump the configuration. Issues no network request.
    ShowConfig,
    Report { assume_price: Option<f64> },
}

#[derive(Debug)]
pub struct CliAdapter {
    store: ConfigStore,
}

impl CliAdapter {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Runs one command and returns the text to print. Setup prompts happen outside any span,
    /// so no progress spinner draws over them.
    pub async fn handle(
        &self,
        command: Command,
        prompter: &mut dyn SetupPrompter,
    ) -> Result<String, CommandError> {
        let config = self
            .store
            .load_or_init(prompter)
            .change_context(CommandError::Configuration)?;

        match command {
            Command::ShowConfig => Ok(render_config(self.store.path(), &config)),
            Command::Report { assume_price } => {
                let tracker = Self::build_tracker(&config)?;
                let report = tracker
                    .run(assume_price)
                    .await
                    .change_context(CommandError::Report)?;
                info!("✅ Balance report ready");
                Ok(report.render())
            }
        }
    }

    fn build_tracker(config: &AppConfig) -> Result<BtcTracker, CommandError> {
        let client = build_http_client().change_context(CommandError::HttpClient)?;

        Ok(BtcTracker::new(
            Box::new(CoinGeckoApi::new(client.clone())),
            Box::new(BlockchainInfoExplorer::new(client.clone())),
            Box::new(BinanceSpotAccount::new(
                client,
                &config.binance_api_key,
                &config.binance_api_secret,
            )),
            config.btc_addresses.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    /// Fails the test if setup is ever triggered.
    struct NoPrompts;

    impl SetupPrompter for NoPrompts {
        fn ask(&mut self, question: &str) -> io::Result<String> {
            panic!("unexpected prompt: {question}");
        }
    }

    fn adapter_with(config: &AppConfig) -> (tempfile::TempDir, CliAdapter) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.save(config).unwrap();
        (dir, CliAdapter::new(store))
    }

    #[tokio::test]
    async fn test_show_config_prints_without_network() {
        let (_dir, adapter) = adapter_with(&AppConfig {
            btc_addresses: vec!["bc1qa".to_owned()],
            binance_api_key: "abcdefghijkl".to_owned(),
            binance_api_secret: "secret-value".to_owned(),
        });

        let output = adapter
            .handle(Command::ShowConfig, &mut NoPrompts)
            .await
            .unwrap();

        assert!(output.contains("  - bc1qa"));
        assert!(output.contains("****ijkl"));
        assert!(!output.contains("secret-value"));
    }

    #[tokio::test]
    async fn test_report_with_assumed_price_and_nothing_configured() {
        // No addresses and no credentials: nothing to fetch, so no request leaves the process.
        let (_dir, adapter) = adapter_with(&AppConfig::default());

        let output = adapter
            .handle(
                Command::Report {
                    assume_price: Some(95_000.0),
                },
                &mut NoPrompts,
            )
            .await
            .unwrap();

        assert!(output.contains("=== BTC Price (assumed) ==="));
        assert!(output.contains("Binance: not configured"));
        assert!(output.contains("TOTAL BTC: 0.00000000"));
    }

    #[tokio::test]
    async fn test_malformed_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let adapter = CliAdapter::new(ConfigStore::new(path));

        let report = adapter
            .handle(Command::ShowConfig, &mut NoPrompts)
            .await
            .unwrap_err();

        assert!(matches!(
            report.current_context(),
            CommandError::Configuration
        ));
    }
}
