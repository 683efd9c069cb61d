use super::balance::{Satoshis, SATOSHIS_PER_BTC};

/// Fixed USD → EUR conversion rate applied to every quote.
pub const EUR_RATE: f64 = 0.92;

// Currency codes are upper case acronyms
#[allow(clippy::upper_case_acronyms)]
#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Fiat {
    USD,
    EUR,
}

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum PriceOrigin {
    Live,
    Assumed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub usd: f64,
    pub eur: f64,
    pub origin: PriceOrigin,
}

impl PriceQuote {
    pub fn from_usd(usd: f64, origin: PriceOrigin) -> Self {
        Self {
            usd,
            eur: usd * EUR_RATE,
            origin,
        }
    }

    pub fn price(&self, fiat: Fiat) -> f64 {
        match fiat {
            Fiat::USD => self.usd,
            Fiat::EUR => self.eur,
        }
    }

    /// Fiat value of `amount`. Multiplies before dividing so whole-satoshi amounts
    /// at whole prices come out exact.
    pub fn value_of(&self, amount: Satoshis, fiat: Fiat) -> f64 {
        amount.0 as f64 * self.price(fiat) / SATOSHIS_PER_BTC as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eur_is_derived_from_usd() {
        for usd in [1.0, 95_000.0, 61_234.56, 0.01] {
            let quote = PriceQuote::from_usd(usd, PriceOrigin::Assumed);
            assert_eq!(quote.eur, usd * 0.92);
            assert_eq!(quote.price(Fiat::USD), usd);
        }
    }

    #[test]
    fn test_value_of() {
        let quote = PriceQuote::from_usd(95_000.0, PriceOrigin::Live);
        assert_eq!(quote.value_of(Satoshis(80_000_000), Fiat::USD), 76_000.0);
        assert_eq!(format!("{:.2}", quote.value_of(Satoshis(80_000_000), Fiat::EUR)), "69920.00");
        assert_eq!(quote.value_of(Satoshis::ZERO, Fiat::EUR), 0.0);
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(PriceOrigin::Live.to_string(), "live");
        assert_eq!(PriceOrigin::Assumed.to_string(), "assumed");
        assert_eq!(Fiat::EUR.to_string(), "EUR");
    }
}
