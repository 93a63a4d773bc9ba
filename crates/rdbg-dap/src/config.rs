use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::configuration::Configuration;
use crate::error::{RdbgAdapterError, Result};

pub const DEFAULT_RDBG_PATH: &str = "rdbg";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Options as supplied by the user. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOptions {
    pub nonstop: Option<bool>,
    pub rdbg_path: Option<String>,
    pub configurations: Option<Vec<Configuration>>,
    pub should_include_default_configurations: Option<bool>,
}

impl UserOptions {
    /// Layers `self` over `fallback`: for every field the first value that is set wins.
    pub fn merge(self, fallback: UserOptions) -> UserOptions {
        UserOptions {
            nonstop: self.nonstop.or(fallback.nonstop),
            rdbg_path: self.rdbg_path.or(fallback.rdbg_path),
            configurations: self.configurations.or(fallback.configurations),
            should_include_default_configurations: self
                .should_include_default_configurations
                .or(fallback.should_include_default_configurations),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| RdbgAdapterError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| RdbgAdapterError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` when given, otherwise the options file in [`config_dir`].
    /// A missing default file yields empty options.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "Loading options file");
            return Self::from_file(path);
        }

        let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)) else {
            return Ok(Self::default());
        };

        match Self::from_file(&path) {
            Err(RdbgAdapterError::ConfigFile { source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!(path = %path.display(), "No options file found");
                Ok(Self::default())
            }
            result => result,
        }
    }
}

pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("RDBG_DAP_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("rdbg-dap")))
}

/// Process-wide settings with every default applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    pub nonstop: bool,
    pub rdbg_path: String,
    pub configurations: Vec<Configuration>,
    pub should_include_default_configurations: bool,
}

impl Default for Options {
    fn default() -> Self {
        merge_options(UserOptions::default())
    }
}

pub fn merge_options(user: UserOptions) -> Options {
    let options = Options {
        nonstop: user.nonstop.unwrap_or(false),
        rdbg_path: user
            .rdbg_path
            .unwrap_or_else(|| DEFAULT_RDBG_PATH.to_string()),
        configurations: user.configurations.unwrap_or_default(),
        should_include_default_configurations: user
            .should_include_default_configurations
            .unwrap_or(true),
    };

    debug!(
        nonstop = options.nonstop,
        rdbg_path = %options.rdbg_path,
        configurations = options.configurations.len(),
        include_defaults = options.should_include_default_configurations,
        "Merged options"
    );
    options
}
