pub mod balance;
pub mod price;
pub mod totals;

pub use balance::*;
pub use price::*;
pub use totals::*;
