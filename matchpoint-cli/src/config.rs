use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use matchpoint_core::BracketOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    if let Ok(value) = value.parse() {
                        $config.$name = value;
                    }
                }
            }
        )*
    }};
}

/// The default path of the config file.
pub const DEFAULT_PATH: &str = "matchpoint.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    /// The file the key-value store is persisted to.
    pub store: PathBuf,
    /// The number of finished tournaments kept in the history.
    pub history_limit: usize,
    pub bracket: BracketOptions,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;
        Self::from_toml(&buf)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads the config from `path`. The default path is allowed to be missing, in which case the
    /// default config is used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::from_file(DEFAULT_PATH) {
                Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                    Ok(Self::default())
                }
                res => res,
            },
        }
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(
            self,
            "MP_LOGLEVEL",
            loglevel,
            "MP_STORE",
            store,
            "MP_HISTORY_LIMIT",
            history_limit,
        );
        from_environment!(self.bracket, "MP_STANDARD_PLACEMENT", standard_placement);

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Warn,
            store: PathBuf::from("matchpoint.json"),
            history_limit: 10,
            bracket: BracketOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
