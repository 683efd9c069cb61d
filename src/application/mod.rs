pub mod price;
pub mod report;
pub mod tracker;
