use std::env;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::log::LogConfig;
use self::network::NetworkConfig;
use self::shutdown::ShutdownConfig;

pub mod dictionary;
pub mod log;
pub mod neologd;
pub mod network;
pub mod shutdown;

pub use neologd::NeologdConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub dictionary: DictionaryConfig,
    pub shutdown: ShutdownConfig,
    pub log: LogConfig,
}

impl Config {
    /// Build the configuration from process environment variables
    pub fn new() -> Self {
        Self::from_env(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            network: NetworkConfig::from_env(&lookup),
            dictionary: DictionaryConfig::from_env(&lookup),
            shutdown: ShutdownConfig::from_env(&lookup),
            log: LogConfig::from_env(&lookup),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env(|_| None)
    }
}
