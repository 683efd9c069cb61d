use std::io::{self, BufRead, Write};

use error_stack::{Result, ResultExt};

use super::{app_config::AppConfig, store::ConfigError};

/// Source of answers for the first-time setup.
pub trait SetupPrompter {
    /// Asks a single question. End of input is an empty answer.
    fn ask(&mut self, question: &str) -> io::Result<String>;

    fn announce(&mut self, _message: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Interactive prompter over the process' stdin/stdout.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl SetupPrompter for StdinPrompter {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}: ")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_owned())
    }

    fn announce(&mut self, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{message}")
    }
}

/// Collects addresses until an empty answer, then the Binance credentials.
pub fn run_setup(prompter: &mut dyn SetupPrompter) -> Result<AppConfig, ConfigError> {
    prompter
        .announce("=== First-Time Setup ===\n\nEnter your BTC addresses (empty input to finish):")
        .change_context(ConfigError::SetupError)?;

    let mut btc_addresses = Vec::new();
    loop {
        let address = prompter
            .ask("BTC Address")
            .change_context(ConfigError::SetupError)?;
        if address.is_empty() {
            break;
        }
        btc_addresses.push(address);
    }

    let binance_api_key = prompter
        .ask("Binance API Key")
        .change_context(ConfigError::SetupError)?;
    let binance_api_secret = prompter
        .ask("Binance API Secret")
        .change_context(ConfigError::SetupError)?;

    Ok(AppConfig {
        btc_addresses,
        binance_api_key,
        binance_api_secret,
    }
    .normalized())
}
