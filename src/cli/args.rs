use std::path::PathBuf;

use clap::Parser;

use super::cli_adapter::Command;
use crate::config::store::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "btc-balance")]
#[command(version, about = "Sum BTC held on addresses and on Binance, valued in USD and EUR", long_about = None)]
pub struct Cli {
    /// Assume a manual BTC price in USD instead of fetching it
    #[arg(long, value_name = "USD", value_parser = parse_price)]
    pub assume_price: Option<f64>,

    /// Print the current configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Configuration file, created by the first-time setup when missing
    #[arg(long, value_name = "PATH", env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn command(&self) -> Command {
        if self.show_config {
            Command::ShowConfig
        } else {
            Command::Report {
                assume_price: self.assume_price,
            }
        }
    }
}

fn parse_price(value: &str) -> Result<f64, String> {
    let price: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(format!("price must be a positive number, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_report() {
        let cli = Cli::try_parse_from(["btc-balance"]).unwrap();
        assert_eq!(cli.command(), Command::Report { assume_price: None });
        assert!(!cli.verbose);
    }

    #[test]
    fn test_assume_price() {
        let cli = Cli::try_parse_from(["btc-balance", "--assume-price", "95000"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Report {
                assume_price: Some(95_000.0)
            }
        );
    }

    #[test]
    fn test_show_config_wins() {
        let cli =
            Cli::try_parse_from(["btc-balance", "--show-config", "--assume-price", "1"]).unwrap();
        assert_eq!(cli.command(), Command::ShowConfig);
    }

    #[test]
    fn test_config_path_flag() {
        let cli = Cli::try_parse_from(["btc-balance", "--config", "/tmp/btc.json", "-v"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/tmp/btc.json"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_bad_prices() {
        for price in ["abc", "0", "-5", "inf", "NaN"] {
            assert!(
                Cli::try_parse_from(["btc-balance", "--assume-price", price]).is_err(),
                "accepted {price}"
            );
        }
    }
}
