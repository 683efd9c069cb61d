pub mod blockchain;
pub mod exchange;
pub mod http;
pub mod price;
