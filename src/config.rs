/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub elevator: ElevatorConfig,
    pub event_source: EventSourceConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub id: u32,
    pub start_floor: i32,
    pub travel_time_ms: u64,
    pub dwell_time_ms: u64,
    pub poll_interval_ms: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EventSourceConfig {
    pub path: PathBuf,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            id: 1,
            start_floor: 0,
            travel_time_ms: 500,
            dwell_time_ms: 500,
            poll_interval_ms: 500,
        }
    }
}

impl ElevatorConfig {
    pub fn travel_time(&self) -> Duration {
        Duration::from_millis(self.travel_time_ms)
    }

    pub fn dwell_time(&self) -> Duration {
        Duration::from_millis(self.dwell_time_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for EventSourceConfig {
    fn default() -> Self {
        EventSourceConfig {
            path: PathBuf::from("buttonPresser.csv"),
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(config_str).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&config_str, path)
}
