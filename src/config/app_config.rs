use std::fmt;

/// Tracked addresses and exchange credentials, as persisted in the configuration file.
#[derive(serde::Deserialize, serde::Serialize, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub btc_addresses: Vec<String>,
    pub binance_api_key: String,
    pub binance_api_secret: String,
}

impl AppConfig {
    /// Trims every field and turns the address list into an ordered set.
    pub fn normalized(self) -> Self {
        let mut btc_addresses: Vec<String> = Vec::with_capacity(self.btc_addresses.len());
        for address in self.btc_addresses {
            let address = address.trim();
            if !address.is_empty() && !btc_addresses.iter().any(|known| known == address) {
                btc_addresses.push(address.to_owned());
            }
        }

        Self {
            btc_addresses,
            binance_api_key: self.binance_api_key.trim().to_owned(),
            binance_api_secret: self.binance_api_secret.trim().to_owned(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("btc_addresses", &self.btc_addresses)
            .field("binance_api_key", &mask_credential(&self.binance_api_key))
            .field("binance_api_secret", &"<redacted>")
            .finish()
    }
}

/// Keeps only the last four characters of a credential.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    match chars.len() {
        0 => "(not set)".to_owned(),
        1..=8 => "****".to_owned(),
        len => format!("****{}", chars[len - 4..].iter().collect::<String>()),
    }
}
