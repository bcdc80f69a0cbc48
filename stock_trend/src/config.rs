//! TOML-backed application configuration.
//!
//! Every section and field has a default, so an empty file (or no file at all)
//! yields a working setup that talks to the public endpoints directly. API keys
//! never live in the file: the file names the environment variables to read
//! them from.
//!
//! ```toml
//! [relay]
//! base_url = "http://localhost:3000/yahoo-finance-api"
//!
//! [alpha_vantage]
//! api_key_env = "ALPHAVANTAGE_API_KEY"
//! max_requests_per_minute = 5
//!
//! [session]
//! default_symbols = ["AAPL", "TSLA"]
//! default_range = "1mo"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{errors::Error, models::range::Range};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub http: HttpConfig,
    /// Chart and search endpoints (directly, or through a forwarding relay).
    pub relay: RelayConfig,
    pub alpha_vantage: AlphaVantageConfig,
    pub finnhub: FinnhubConfig,
    pub search: SearchConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout. Expiry surfaces as a transport error.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("stock-trend/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub base_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlphaVantageConfig {
    /// Set to `false` to drop the fallback provider from the chain.
    pub enabled: bool,
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub max_requests_per_minute: u32,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.alphavantage.co".to_string(),
            api_key_env: "ALPHAVANTAGE_API_KEY".to_string(),
            max_requests_per_minute: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinnhubConfig {
    pub base_url: String,
    pub api_key_env: String,
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            base_url: "https://finnhub.io/api/v1".to_string(),
            api_key_env: "FINNHUB_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Queries shorter than this never reach the network.
    pub min_query_len: usize,
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            max_results: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Symbols tracked (and selected) when a session starts.
    pub default_symbols: Vec<String>,
    pub default_range: Range,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_symbols: vec!["AAPL".to_string(), "TSLA".to_string()],
            default_range: Range::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.session.default_symbols, vec!["AAPL", "TSLA"]);
        assert_eq!(cfg.session.default_range, Range::OneDay);
        assert_eq!(cfg.search.min_query_len, 2);
        assert!(cfg.alpha_vantage.enabled);
        assert_eq!(cfg.finnhub.api_key_env, "FINNHUB_API_KEY");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [alpha_vantage]
            max_requests_per_minute = 25

            [session]
            default_range = "6mo"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.alpha_vantage.max_requests_per_minute, 25);
        assert_eq!(cfg.alpha_vantage.api_key_env, "ALPHAVANTAGE_API_KEY");
        assert_eq!(cfg.session.default_range, Range::SixMonths);
        assert_eq!(cfg.session.default_symbols.len(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_toml_str("[relay]\nbase = \"x\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[relay]\nbase_url = \"http://localhost:3000/yahoo-finance-api\"").unwrap();
        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.relay.base_url, "http://localhost:3000/yahoo-finance-api");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
