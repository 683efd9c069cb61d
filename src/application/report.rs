use std::fmt::Write;
use std::path::Path;

use strum::IntoEnumIterator;

use crate::config::{app_config::mask_credential, AppConfig};
use crate::domain::{
    BalanceEntry, BalanceOutcome, Fiat, PriceOrigin, PriceQuote, Satoshis, Totals, EUR_RATE,
};

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub quote: PriceQuote,
    pub address_balances: Vec<BalanceEntry>,
    pub exchange_balance: BalanceEntry,
}

impl Report {
    pub fn totals(&self) -> Totals {
        Totals::from_entries(
            &self.quote,
            self.address_balances
                .iter()
                .chain(std::iter::once(&self.exchange_balance)),
        )
    }

    pub fn render(&self) -> String {
        render(&self.quote, &self.address_balances, &self.exchange_balance)
    }
}

fn fiat_columns(quote: &PriceQuote, amount: Satoshis) -> String {
    Fiat::iter()
        .map(|fiat| format!("{fiat} {:.2}", quote.value_of(amount, fiat)))
        .collect::<Vec<_>>()
        .join("  |  ")
}

fn render_entry(out: &mut String, quote: &PriceQuote, entry: &BalanceEntry) {
    // Writing into a String cannot fail.
    let _ = match &entry.outcome {
        BalanceOutcome::Fetched(amount) => writeln!(
            out,
            "{}: {amount} BTC  |  {}",
            entry.source,
            fiat_columns(quote, *amount)
        ),
        BalanceOutcome::Failed(message) => {
            writeln!(out, "{}: error: {message} (counted as 0)", entry.source)
        }
        BalanceOutcome::NotConfigured => {
            writeln!(out, "{}: not configured (counted as 0)", entry.source)
        }
    };
}

/// Renders the console summary. BTC amounts use 8 decimals, fiat values 2.
pub fn render(
    quote: &PriceQuote,
    address_balances: &[BalanceEntry],
    exchange_balance: &BalanceEntry,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== BTC Price ({}) ===", quote.origin);
    let _ = writeln!(
        out,
        "USD {:.2}  |  EUR {:.2}  (fixed EUR rate {EUR_RATE})",
        quote.usd, quote.eur
    );
    if quote.origin == PriceOrigin::Assumed {
        let _ = writeln!(out, "Using an assumed price, not a live quote");
    }

    let _ = writeln!(out, "\n=== BTC Address Balances ===");
    if address_balances.is_empty() {
        let _ = writeln!(out, "(no addresses configured)");
    }
    for entry in address_balances {
        render_entry(&mut out, quote, entry);
    }

    let _ = writeln!(out, "\n=== {} BTC Spot Balance ===", exchange_balance.source);
    render_entry(&mut out, quote, exchange_balance);

    let totals = Totals::from_entries(
        quote,
        address_balances.iter().chain(std::iter::once(exchange_balance)),
    );
    let _ = writeln!(out, "\n=== TOTAL BTC VALUE ===");
    let _ = writeln!(out, "TOTAL BTC: {}", totals.btc);
    for fiat in Fiat::iter() {
        let _ = writeln!(out, "TOTAL {fiat}: {:.2}", totals.value(fiat));
    }

    out
}

/// Renders the `--show-config` dump. The API secret is never shown.
pub fn render_config(path: &Path, config: &AppConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Configuration ({}) ===", path.display());
    let _ = writeln!(out, "BTC addresses:");
    if config.btc_addresses.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for address in &config.btc_addresses {
        let _ = writeln!(out, "  - {address}");
    }
    let _ = writeln!(
        out,
        "Binance API key: {}",
        mask_credential(&config.binance_api_key)
    );
    let secret = if config.binance_api_secret.is_empty() {
        "(not set)"
    } else {
        "********"
    };
    let _ = writeln!(out, "Binance API secret: {secret}");

    out
}
