//! Settings for the `magpie` binary, read from a YAML file
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! A configuration file looks like this, and every field is optional:
//!
//! ```yaml
//! log:
//!   enabled: true
//!   file: magpie.log
//!   level: debug
//! magic:
//!   seed: 12345
//!   max_attempts: 10000000
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::fs::read_to_string;
use std::io;
use std::path::{Path, PathBuf};
use log::LevelFilter;
use serde::Deserialize;
use crate::chess::bitboard::magic::DEFAULT_MAX_ATTEMPTS;

/// The name of the directory, within the user's home directory, holding the configuration file
pub const APP_DIR: &str = ".magpie";

/// The name of the configuration file
pub const CONFIG_FILE: &str = "config.yaml";

////////////////////////////////////////////////////////////////////////////////////////////////////
/// All settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Logging settings
    pub log: LogConfig,
    /// Magic table settings
    pub magic: MagicConfig,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Whether a log file is written at all
    pub enabled: bool,
    /// Where the log is written
    pub file: PathBuf,
    /// One of `off`, `error`, `warn`, `info`, `debug` or `trace`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            enabled: false,
            file: PathBuf::from("magpie.log"),
            level: "info".to_owned(),
        }
    }
}

impl LogConfig {
    /// Returns the configured level as a filter for the logger
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.level)
    }
}

/// Magic table settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MagicConfig {
    /// Seed for reproducible tables; a fresh random seed is used when absent
    pub seed: Option<u64>,
    /// The number of candidates tried per square before giving up
    pub max_attempts: usize,
}

impl Default for MagicConfig {
    fn default() -> Self {
        MagicConfig {
            seed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Config {
    /// Parses a configuration from YAML text
    pub fn from_yaml_str(s: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_str(s)?;
        config.log.level_filter()?;
        Ok(config)
    }

    /// Reads a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let s = read_to_string(path).map_err(|err| ConfigError::Io(path.to_owned(), err))?;
        Config::from_yaml_str(&s)
    }

    /// Returns the location of the configuration file in the user's home directory, if the home
    /// directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Reads the file at `path` if given, or else the default file if it exists, or else returns
    /// the defaults
    pub fn find(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::load(path),
            None => match Config::default_path() {
                Some(path) if path.is_file() => Config::load(path),
                _ => Ok(Config::default()),
            },
        }
    }
}

/// Converts a level name to a filter for the logger
pub fn parse_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(ConfigError::InvalidLevel(level.to_owned())),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error reading a configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io(PathBuf, io::Error),
    /// The text is not valid YAML for a `Config`
    Yaml(serde_yaml::Error),
    /// Unknown log level name
    InvalidLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, err) => write!(f, "{}: {}", path.display(), err),
            ConfigError::Yaml(err) => write!(f, "invalid configuration: {}", err),
            ConfigError::InvalidLevel(level) => write!(f, "{}: invalid log level", level),
        }
    }
}

impl std::error::Error for ConfigError { }

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.log.enabled);
        assert_eq!(config.log.file, PathBuf::from("magpie.log"));
        assert_eq!(config.log.level_filter().unwrap(), LevelFilter::Info);
        assert_eq!(config.magic.seed, None);
        assert_eq!(config.magic.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn fields_are_read() {
        let config = Config::from_yaml_str(
            "log:\n  enabled: true\n  file: /tmp/m.log\n  level: trace\n\
             magic:\n  seed: 42\n  max_attempts: 1000\n").unwrap();
        assert!(config.log.enabled);
        assert_eq!(config.log.file, PathBuf::from("/tmp/m.log"));
        assert_eq!(config.log.level_filter().unwrap(), LevelFilter::Trace);
        assert_eq!(config.magic.seed, Some(42));
        assert_eq!(config.magic.max_attempts, 1000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_yaml_str("magic:\n  seed: 7\n").unwrap();
        assert_eq!(config.log, LogConfig::default());
        assert_eq!(config.magic.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn bad_input_is_rejected() {
        match Config::from_yaml_str("log:\n  level: loud\n") {
            Err(ConfigError::InvalidLevel(level)) => assert_eq!(level, "loud"),
            other => panic!("unexpected result {:?}", other),
        }
        match Config::from_yaml_str("colour: blue\n") {
            Err(ConfigError::Yaml(_)) => {},
            other => panic!("unexpected result {:?}", other),
        }
        match Config::from_yaml_str("magic:\n  seed: -1\n") {
            Err(ConfigError::Yaml(_)) => {},
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        match Config::load("/nonexistent/magpie/config.yaml") {
            Err(ConfigError::Io(path, _)) => {
                assert_eq!(path, PathBuf::from("/nonexistent/magpie/config.yaml"));
            },
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn level_names() {
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert_eq!(parse_level("warn").unwrap(), LevelFilter::Warn);
        assert!(parse_level("INFO").is_err());
    }
}
