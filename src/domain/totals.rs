use super::{
    balance::{BalanceEntry, Satoshis},
    price::{Fiat, PriceQuote},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub btc: Satoshis,
    pub usd: f64,
    pub eur: f64,
}

impl Totals {
    pub fn from_entries<'a>(
        quote: &PriceQuote,
        entries: impl IntoIterator<Item = &'a BalanceEntry>,
    ) -> Self {
        let btc: Satoshis = entries.into_iter().map(BalanceEntry::contribution).sum();

        Self {
            btc,
            usd: quote.value_of(btc, Fiat::USD),
            eur: quote.value_of(btc, Fiat::EUR),
        }
    }

    pub fn value(&self, fiat: Fiat) -> f64 {
        match fiat {
            Fiat::USD => self.usd,
            Fiat::EUR => self.eur,
        }
    }
}
