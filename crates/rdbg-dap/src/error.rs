use std::io;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RdbgAdapterError {
    #[error("missing dependency: {0}")]
    MissingDependency(String),
    #[error("must be able to create a local socket: {0}")]
    SocketUnavailable(io::Error),
    #[error("a port is required to run the debugger")]
    PortRequired,
    #[error("Failed to read port from prompt: {0}")]
    Prompt(#[from] ReadlineError),
    #[error("Failed to read options file '{path}': {source}")]
    ConfigFile { path: PathBuf, source: io::Error },
    #[error("Failed to parse options file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to spawn debugger: {0}")]
    Spawn(io::Error),
    #[error("Unknown configuration: {0}")]
    UnknownConfiguration(String),
    #[error("Failed to serialize descriptor: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RdbgAdapterError>;
