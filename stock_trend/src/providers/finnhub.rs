//! Real-time quote source.

pub mod provider;
pub mod response;

pub use provider::FinnhubProvider;
