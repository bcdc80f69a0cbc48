//! Primary historical source: the v8 chart endpoint (parallel timestamp and
//! close arrays).

pub mod provider;
pub mod response;

pub use provider::YahooChartProvider;
