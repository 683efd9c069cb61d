use std::{fmt, iter::Sum, ops::Add, str::FromStr};

use thiserror::Error;

pub const SATOSHIS_PER_BTC: u64 = 100_000_000;
const BTC_DECIMALS: usize = 8;

/// A BTC amount held as whole satoshis, so sums stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Satoshis(pub u64);

impl Satoshis {
    pub const ZERO: Satoshis = Satoshis(0);
}

impl Add for Satoshis {
    type Output = Satoshis;

    fn add(self, rhs: Self) -> Self::Output {
        Satoshis(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Satoshis {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Satoshis::ZERO, Add::add)
    }
}

/// Formats as BTC with 8 decimals, without going through floating point.
impl fmt::Display for Satoshis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:08}",
            self.0 / SATOSHIS_PER_BTC,
            self.0 % SATOSHIS_PER_BTC
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount '{0}' is not a decimal number")]
    InvalidDigits(String),
    #[error("amount '{0}' has more than 8 decimal places")]
    TooPrecise(String),
    #[error("amount '{0}' is too large")]
    Overflow(String),
}

/// Parses a decimal BTC string such as `"0.50000000"` into satoshis.
impl FromStr for Satoshis {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseAmountError::Empty);
        }

        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(ParseAmountError::InvalidDigits(s.to_owned()));
        }

        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > BTC_DECIMALS {
            return Err(ParseAmountError::TooPrecise(s.to_owned()));
        }

        let overflow = || ParseAmountError::Overflow(s.to_owned());
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let fraction: u64 = format!("{fraction:0<width$}", width = BTC_DECIMALS)
            .parse()
            .map_err(|_| ParseAmountError::InvalidDigits(s.to_owned()))?;

        whole
            .checked_mul(SATOSHIS_PER_BTC)
            .and_then(|sats| sats.checked_add(fraction))
            .map(Satoshis)
            .ok_or_else(overflow)
    }
}

/// Where a balance came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BalanceSource {
    Address(String),
    Exchange(&'static str),
}

impl fmt::Display for BalanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceSource::Address(address) => f.write_str(address),
            BalanceSource::Exchange(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceOutcome {
    Fetched(Satoshis),
    /// The fetch failed; the message is shown to the operator in place of the amount.
    Failed(String),
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    pub source: BalanceSource,
    pub outcome: BalanceOutcome,
}

impl BalanceEntry {
    pub fn fetched(source: BalanceSource, amount: Satoshis) -> Self {
        Self {
            source,
            outcome: BalanceOutcome::Fetched(amount),
        }
    }

    pub fn failed(source: BalanceSource, message: impl Into<String>) -> Self {
        Self {
            source,
            outcome: BalanceOutcome::Failed(message.into()),
        }
    }

    pub fn not_configured(source: BalanceSource) -> Self {
        Self {
            source,
            outcome: BalanceOutcome::NotConfigured,
        }
    }

    /// Amount this entry adds to the totals. Failed and unconfigured sources count as zero.
    pub fn contribution(&self) -> Satoshis {
        match self.outcome {
            BalanceOutcome::Fetched(amount) => amount,
            BalanceOutcome::Failed(_) | BalanceOutcome::NotConfigured => Satoshis::ZERO,
        }
    }
}
