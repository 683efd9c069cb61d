pub mod app_config;
pub mod setup;
pub mod store;

pub use app_config::AppConfig;
pub use setup::{SetupPrompter, StdinPrompter};
pub use store::{ConfigError, ConfigStore};
