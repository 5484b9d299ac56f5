//! Console configuration types.

use serde::{Deserialize, Serialize};

/// Top-level console configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the payments backend, e.g. "http://localhost:5001/api".
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token forwarded on every request. Empty means unauthenticated —
    /// fine against a local backend that holds its own upstream credentials.
    #[serde(default)]
    pub api_key: String,

    /// Directory for the persisted cache slot (and any future local state).
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Directory cache parameters.
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP client parameters.
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a cached organization snapshot stays fresh, in milliseconds.
    #[serde(default = "default_freshness_ms")]
    pub freshness_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Client-side read budget (GET-ish calls per second).
    #[serde(default = "default_reads_per_sec")]
    pub reads_per_sec: u32,

    /// Client-side write budget (mutating calls per second).
    #[serde(default = "default_writes_per_sec")]
    pub writes_per_sec: u32,
}

fn default_api_base_url() -> String {
    "http://localhost:5001/api".to_string()
}

fn default_state_dir() -> String {
    ".payops".to_string()
}

fn default_freshness_ms() -> i64 {
    2 * 60 * 1000
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_reads_per_sec() -> u32 {
    20
}

fn default_writes_per_sec() -> u32 {
    10
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            state_dir: default_state_dir(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_ms: default_freshness_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            reads_per_sec: default_reads_per_sec(),
            writes_per_sec: default_writes_per_sec(),
        }
    }
}
