pub mod exchange;
pub mod explorer;
pub mod price_source;

pub use exchange::*;
pub use explorer::*;
pub use price_source::*;
