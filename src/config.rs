//! YAML configuration for standalone use of the diff core (e.g. the demo
//! binary). Zone content, TSIG, and server networking are out of scope for
//! this crate and are not modeled here - only what the orchestrator needs to
//! decide where spool files live and how loudly to log.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;

pub const BASE_CONFIG_FILE: &str = "ixfr-diff.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory spool files are written into. Defaults to the directory
    /// containing the zone file being diffed (see `DiffSession::start`).
    #[serde(default)]
    pub spool_dir: Option<PathBuf>,

    #[serde(default)]
    pub log: LogConfig,
}

impl TryFrom<&[u8]> for Config {
    type Error = crate::error::Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        Ok(serde_yaml::from_slice(value)?)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LogConfig {
    #[serde(deserialize_with = "de_level_filter", default = "default_level")]
    pub level: log::LevelFilter,
    #[serde(default)]
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: log::LevelFilter::Info,
            color: false,
        }
    }
}

fn default_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

fn de_level_filter<'de, D>(deserializer: D) -> std::result::Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: LevelFilter = Deserialize::deserialize(deserializer)?;
    match s {
        LevelFilter::Off => Ok(log::LevelFilter::Off),
        LevelFilter::Error => Ok(log::LevelFilter::Error),
        LevelFilter::Warn => Ok(log::LevelFilter::Warn),
        LevelFilter::Info => Ok(log::LevelFilter::Info),
        LevelFilter::Debug => Ok(log::LevelFilter::Debug),
        LevelFilter::Trace => Ok(log::LevelFilter::Trace),
    }
}

#[derive(Deserialize)]
enum LevelFilter {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            spool_dir: None,
            log: LogConfig::default(),
        }
    }
}
