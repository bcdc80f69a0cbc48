use std::path::PathBuf;

use thiserror::Error;

use crate::{models::range::RangeError, providers::ProviderInitError};

/// The unified error type for the `stock_trend` crate.
///
/// Provider failures during a fetch never surface here: the fetch chain absorbs
/// them. This covers setup problems only.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("Failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`AppConfig`](crate::config::AppConfig).
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A provider adapter could not be constructed.
    #[error("Provider initialization error: {0}")]
    ProviderInit(#[from] ProviderInitError),

    /// A range token was not recognized.
    #[error(transparent)]
    Range(#[from] RangeError),
}
