pub mod chart;
pub mod position;
pub mod price;
pub mod snapshot;
pub mod valuation;
pub mod wallet;
