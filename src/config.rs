use std::env;
use std::time::Duration;

use crate::http_client::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_STATE_URL: &str = "http://localhost:8080/api/state.json";
pub const DEFAULT_POLL_MS: u64 = 1000;
pub const MIN_POLL_MS: u64 = 100;
pub const DEFAULT_ASSET_ROOT: &str = "assets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    pub state_url: String,
    pub poll_interval: Duration,
    pub source: SourceKind,
    pub asset_root: String,
    pub http_timeout: Duration,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            state_url: DEFAULT_STATE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            source: SourceKind::Http,
            asset_root: DEFAULT_ASSET_ROOT.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OverlayConfig {
    /// Reads `OVERLAY_*` variables. Call after the dotenv files are loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let state_url = lookup("OVERLAY_STATE_URL")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.state_url);
        let poll_ms = lookup("OVERLAY_POLL_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_MS)
            .max(MIN_POLL_MS);
        let source = match lookup("OVERLAY_SOURCE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "demo" | "mock" => SourceKind::Demo,
            _ => SourceKind::Http,
        };
        let asset_root = lookup("OVERLAY_ASSET_ROOT")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.asset_root);
        let timeout_secs = lookup("OVERLAY_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);

        Self {
            state_url,
            poll_interval: Duration::from_millis(poll_ms),
            source,
            asset_root,
            http_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
