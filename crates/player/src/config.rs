//! Client configuration loaded from environment variables
//!
//! # Environment Variables
//!
//! - `TABLEAU_ORIGIN` - Page origin the endpoint is derived from (default: http://localhost:8080)
//! - `TABLEAU_WS_PATH` - Connection path (default: /ws)
//! - `TABLEAU_RECONNECT_INITIAL_MS` - First reconnect delay (default: 500)
//! - `TABLEAU_RECONNECT_MAX_MS` - Reconnect delay cap (default: 5000)
//! - `TABLEAU_HEARTBEAT_SECS` - Liveness probe interval (default: 30)
//! - `TABLEAU_PEEK_HIDE_MS` - How long a peeked card stays visible (default: 2000)
//! - `TABLEAU_REVEAL_PACING_MS` - Per-card pacing of the final reveal (default: 800)
//! - `TABLEAU_SWAP_RULE` - `adjacent` or `unconstrained` (default: unconstrained)
//!
//! Missing variables fall back to their defaults; a variable that is set but
//! cannot be parsed is an error.

use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::application::settings::{
    ReducerSettings, ReducerTiming, SwapProposalRule, PEEK_HIDE_MS, REVEAL_PACING_MS,
};
use crate::error::ConfigError;
use crate::infrastructure::websocket::{
    endpoint_url, TransportConfig, DEFAULT_WS_PATH, HEARTBEAT_INTERVAL_SECS,
    INITIAL_RETRY_DELAY_MS, MAX_RETRY_DELAY_MS,
};

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub origin: Url,
    pub transport: TransportConfig,
    pub reducer: ReducerSettings,
}

impl ClientConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_origin = lookup("TABLEAU_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        let origin = Url::parse(raw_origin.trim())
            .map_err(|e| ConfigError::invalid("TABLEAU_ORIGIN", raw_origin.as_str(), e))?;

        let ws_path = lookup("TABLEAU_WS_PATH")
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_WS_PATH.to_string());

        // Reject origins the transport could never turn into an endpoint.
        endpoint_url(&origin, &ws_path)
            .map_err(|e| ConfigError::invalid("TABLEAU_ORIGIN", origin.as_str(), e))?;

        let initial_ms: u64 =
            parse_or(&lookup, "TABLEAU_RECONNECT_INITIAL_MS", INITIAL_RETRY_DELAY_MS)?;
        let max_ms: u64 = parse_or(&lookup, "TABLEAU_RECONNECT_MAX_MS", MAX_RETRY_DELAY_MS)?;
        if max_ms < initial_ms {
            return Err(ConfigError::invalid(
                "TABLEAU_RECONNECT_MAX_MS",
                max_ms.to_string(),
                "must not be below TABLEAU_RECONNECT_INITIAL_MS",
            ));
        }
        let heartbeat_secs: u64 =
            parse_or(&lookup, "TABLEAU_HEARTBEAT_SECS", HEARTBEAT_INTERVAL_SECS)?;
        if heartbeat_secs == 0 {
            return Err(ConfigError::invalid(
                "TABLEAU_HEARTBEAT_SECS",
                "0",
                "must be at least 1",
            ));
        }

        let peek_hide_ms: u64 = parse_or(&lookup, "TABLEAU_PEEK_HIDE_MS", PEEK_HIDE_MS)?;
        let reveal_pacing_ms: u64 =
            parse_or(&lookup, "TABLEAU_REVEAL_PACING_MS", REVEAL_PACING_MS)?;
        let swap_rule = match lookup("TABLEAU_SWAP_RULE") {
            Some(raw) => raw.parse::<SwapProposalRule>()?,
            None => SwapProposalRule::default(),
        };

        Ok(Self {
            origin,
            transport: TransportConfig {
                initial_backoff: Duration::from_millis(initial_ms),
                max_backoff: Duration::from_millis(max_ms),
                heartbeat_interval: Duration::from_secs(heartbeat_secs),
            },
            reducer: ReducerSettings {
                swap_rule,
                timing: ReducerTiming {
                    peek_hide: Duration::from_millis(peek_hide_ms),
                    reveal_pacing: Duration::from_millis(reveal_pacing_ms),
                },
                ws_path,
            },
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid(key, raw.as_str(), e)),
        None => Ok(default),
    }
}
