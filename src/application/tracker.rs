use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::instrument;

use super::{price::get_price, report::Report};
use crate::domain::{BalanceEntry, BalanceSource};
use crate::ports::{
    exchange::{ExchangeAccount, ExchangeError},
    explorer::AddressExplorer,
    price_source::PriceSource,
};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("failed to determine the BTC price")]
    PriceUnavailable,
}

/// Runs price → addresses → exchange, one request at a time.
pub struct BtcTracker {
    price_source: Box<dyn PriceSource>,
    explorer: Box<dyn AddressExplorer>,
    exchange: Box<dyn ExchangeAccount>,
    addresses: Vec<String>,
}

impl std::fmt::Debug for BtcTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BtcTracker")
            .field("price_source", &self.price_source.name())
            .field("explorer", &self.explorer.name())
            .field("exchange", &self.exchange.exchange_name())
            .field("addresses", &self.addresses.len())
            .finish()
    }
}

impl BtcTracker {
    pub fn new(
        price_source: Box<dyn PriceSource>,
        explorer: Box<dyn AddressExplorer>,
        exchange: Box<dyn ExchangeAccount>,
        addresses: Vec<String>,
    ) -> Self {
        Self {
            price_source,
            explorer,
            exchange,
            addresses,
        }
    }

    /// A price failure aborts the run; balance failures are recorded per source.
    #[instrument(skip(self), name = "BtcTracker::run")]
    pub async fn run(&self, assume_price: Option<f64>) -> Result<Report, TrackerError> {
        tracing::info!("Price: ☁️  Getting BTC price");
        let quote = get_price(self.price_source.as_ref(), assume_price)
            .await
            .change_context(TrackerError::PriceUnavailable)?;
        tracing::info!(
            "Price: ✅ USD {:.2} | EUR {:.2} ({})",
            quote.usd,
            quote.eur,
            quote.origin
        );

        tracing::info!(
            "Addresses: ☁️  Fetching {} address balances from {}",
            self.addresses.len(),
            self.explorer.name()
        );
        let mut address_balances = Vec::with_capacity(self.addresses.len());
        for address in &self.addresses {
            address_balances.push(self.fetch_address_balance(address).await);
        }

        let exchange_balance = self.fetch_exchange_balance().await;

        Ok(Report {
            quote,
            address_balances,
            exchange_balance,
        })
    }

    async fn fetch_address_balance(&self, address: &str) -> BalanceEntry {
        let source = BalanceSource::Address(address.to_owned());
        match self.explorer.fetch_balance(address).await {
            Ok(balance) => {
                tracing::debug!("Addresses: {address}: {balance} BTC");
                BalanceEntry::fetched(source, balance)
            }
            Err(report) => {
                tracing::error!("❌ {address}: {report:?}");
                BalanceEntry::failed(source, report.current_context().to_string())
            }
        }
    }

    async fn fetch_exchange_balance(&self) -> BalanceEntry {
        let name = self.exchange.exchange_name();
        let source = BalanceSource::Exchange(name);

        if !self.exchange.is_configured() {
            tracing::warn!("{name}: credentials not configured, skipping");
            return BalanceEntry::not_configured(source);
        }

        tracing::info!("{name}: ☁️  Getting BTC spot balance");
        match self.exchange.fetch_btc_balance().await {
            Ok(balance) => {
                tracing::debug!("{name}: {balance} BTC");
                BalanceEntry::fetched(source, balance)
            }
            Err(report) if matches!(report.current_context(), ExchangeError::NotConfigured(_)) => {
                BalanceEntry::not_configured(source)
            }
            Err(report) => {
                tracing::error!("❌ {name}: {report:?}");
                BalanceEntry::failed(source, report.current_context().to_string())
            }
        }
    }
}
