//! Process settings read from the environment.
//!
//! - `CHATBOT_DATA_DIR`: directory of the file-backed key-value store (default `chatbot_data`)
//! - `CHATBOT_LISTEN_ADDR`: bind address (default `127.0.0.1:3000`)
//! - `CHATBOT_BODY_LIMIT`: maximum request body in bytes (default 1 MiB)
//! - `RUST_LOG`: tracing filter (default `chatbot_manager=info,tower_http=info`)

use crate::error::ConfigError;
use crate::kv::FileStorage;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "chatbot_data";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "chatbot_manager=info,tower_http=info";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub listen_addr: SocketAddr,
    pub body_limit: usize,
    pub log_filter: String,
}

impl Settings {
    /// Load `.env` when present, then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("CHATBOT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let listen_raw = get("CHATBOT_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "CHATBOT_LISTEN_ADDR",
                value: listen_raw.clone(),
            })?;

        let body_limit = match get("CHATBOT_BODY_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "CHATBOT_BODY_LIMIT",
                    value: raw,
                })?,
            None => DEFAULT_BODY_LIMIT,
        };

        let log_filter = get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            listen_addr,
            body_limit,
            log_filter,
        })
    }

    /// Install the global tracing subscriber. Later calls are no-ops.
    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_new(&self.log_filter)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.data_dir.clone())
    }
}
