use std::env;
use std::path::PathBuf;

use log::LevelFilter;
use processor::Error;
use scheduler::{PriorityConfig, PriorityOrder};

/// Runner configuration, read from the environment.
///
/// | variable         | default      |
/// |------------------|--------------|
/// | `INPUT_DIR`      | `inputs`     |
/// | `OUTPUT_DIR`     | `results`    |
/// | `PRIORITY_ORDER` | `descending` |
/// | `LOOKAHEAD`      | `true`       |
/// | `LOG_LEVEL`      | `info`       |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub priority: PriorityConfig,
    pub log_level: LevelFilter,
}

fn parse_flag(key: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{key}: {other:?} is not a boolean"))),
    }
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, Error> {
        let input_dir = lookup("INPUT_DIR").unwrap_or("inputs".to_string());
        let output_dir = lookup("OUTPUT_DIR").unwrap_or("results".to_string());

        let order = match lookup("PRIORITY_ORDER") {
            Some(value) => value
                .parse::<PriorityOrder>()
                .map_err(|err| Error::Config(format!("PRIORITY_ORDER: {err}")))?,
            None => PriorityOrder::default(),
        };
        let lookahead = match lookup("LOOKAHEAD") {
            Some(value) => parse_flag("LOOKAHEAD", &value)?,
            None => true,
        };
        let log_level = match lookup("LOG_LEVEL") {
            Some(value) => value
                .trim()
                .parse::<LevelFilter>()
                .map_err(|_| Error::Config(format!("LOG_LEVEL: unknown level {value:?}")))?,
            None => LevelFilter::Info,
        };

        Ok(Config {
            input_dir: PathBuf::from(input_dir),
            output_dir: PathBuf::from(output_dir),
            priority: PriorityConfig { order, lookahead },
            log_level,
        })
    }
}
