//! # Runtime Configuration Module
//!
//! Environment-variable configuration for the service. CLI flags (see
//! [`crate::cli`]) are layered on top through clap's `env` support, so every
//! variable below can also be passed as a flag.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `YARUKOTO_ADDR` | `0.0.0.0:8080` | listen address |
//! | `YARUKOTO_STORE` | `memory` | `memory` or `rest` |
//! | `YARUKOTO_STORE_URL` | - | PostgREST project URL (required for `rest`) |
//! | `YARUKOTO_STORE_KEY` | - | anon/service key (required for `rest`) |
//! | `YARUKOTO_STORE_TABLE` | `todo` | table name |
//! | `YARUKOTO_STORE_TIMEOUT_MS` | `5000` | per-request store timeout |
//! | `YARUKOTO_STACK_SIZE` | `0x8000` | coroutine stack size, decimal or hex |
//! | `YARUKOTO_LOG_REDACT_LEVEL` | `credentials` | `none` logs the store key in clear |
//!
//! ## Example
//!
//! ```bash
//! export YARUKOTO_STORE=rest
//! export YARUKOTO_STORE_URL=https://xyzcompany.supabase.co
//! export YARUKOTO_STORE_KEY=eyJhbGciOi...
//! cargo run -- serve
//! ```

use crate::otel::{LogConfig, RedactionLevel};
use crate::store::{MemoryStore, RestStore, RestStoreConfig, TodoStore};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TABLE: &str = "todo";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

/// Which [`TodoStore`] implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Memory,
    Rest,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreKind::Memory),
            "rest" | "postgrest" | "supabase" => Ok(StoreKind::Rest),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

/// Configuration error raised before the server starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `YARUKOTO_STORE` names no known backend
    UnknownStore(String),
    /// A variable required by the selected backend is unset or empty
    Missing(&'static str),
    /// A numeric variable failed to parse
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownStore(s) => {
                write!(f, "unknown store '{s}', expected 'memory' or 'rest'")
            }
            ConfigError::Missing(name) => {
                write!(f, "{name} must be set when the rest store is selected")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} is not a valid number: '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub addr: String,
    pub store: StoreKind,
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub store_table: String,
    pub store_timeout: Duration,
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
    /// Redaction applied to the store key in logs (`YARUKOTO_LOG_REDACT_LEVEL`)
    pub redact_level: RedactionLevel,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            store: StoreKind::Memory,
            store_url: None,
            store_key: None,
            store_table: DEFAULT_TABLE.to_string(),
            store_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            stack_size: DEFAULT_STACK_SIZE,
            redact_level: RedactionLevel::Credentials,
        }
    }
}

/// Accepts `16384` or `0x4000`.
pub fn parse_stack_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown store kind or a malformed number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let store = match non_empty("YARUKOTO_STORE") {
            Some(s) => s.parse()?,
            None => defaults.store,
        };

        let store_timeout = match non_empty("YARUKOTO_STORE_TIMEOUT_MS") {
            Some(v) => Duration::from_millis(v.trim().parse().map_err(|_| {
                ConfigError::InvalidNumber {
                    name: "YARUKOTO_STORE_TIMEOUT_MS",
                    value: v.clone(),
                }
            })?),
            None => defaults.store_timeout,
        };

        let stack_size = match non_empty("YARUKOTO_STACK_SIZE") {
            Some(v) => parse_stack_size(&v).ok_or(ConfigError::InvalidNumber {
                name: "YARUKOTO_STACK_SIZE",
                value: v,
            })?,
            None => defaults.stack_size,
        };

        Ok(Self {
            addr: non_empty("YARUKOTO_ADDR").unwrap_or(defaults.addr),
            store,
            store_url: non_empty("YARUKOTO_STORE_URL"),
            store_key: non_empty("YARUKOTO_STORE_KEY"),
            store_table: non_empty("YARUKOTO_STORE_TABLE").unwrap_or(defaults.store_table),
            store_timeout,
            stack_size,
            redact_level: LogConfig::from_env().redact_level,
        })
    }

    /// Check that the selected backend has what it needs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the rest store lacks a URL or key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store == StoreKind::Rest {
            if self.store_url.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Missing("YARUKOTO_STORE_URL"));
            }
            if self.store_key.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Missing("YARUKOTO_STORE_KEY"));
            }
        }
        Ok(())
    }

    /// Construct the configured store. Called once at startup; the returned
    /// handle is shared by every request.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when the REST client cannot be built.
    pub fn build_store(&self) -> anyhow::Result<Arc<dyn TodoStore>> {
        self.validate()?;
        match self.store {
            StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreKind::Rest => {
                let store = RestStore::new(RestStoreConfig {
                    url: self.store_url.clone().unwrap_or_default(),
                    key: self.store_key.clone().unwrap_or_default(),
                    table: self.store_table.clone(),
                    timeout: self.store_timeout,
                    redact: self.redact_level,
                })?;
                Ok(Arc::new(store))
            }
        }
    }
}
