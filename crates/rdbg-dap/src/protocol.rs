use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use serde::Serialize;
use tracing::info;

use crate::error::{RdbgAdapterError, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Where the host connects to reach the debugger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
}

/// How to start `rdbg` when the configuration launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnDescriptor {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl SpawnDescriptor {
    /// Starts the debugger. The child is handed back as is; its lifecycle belongs to the caller.
    pub fn spawn(&self) -> Result<Child> {
        info!(command = %self.command, args = ?self.args, cwd = %self.cwd.display(), "Spawning debugger");

        // Spawning into a missing directory also fails with NotFound.
        if !self.cwd.is_dir() {
            return Err(RdbgAdapterError::Spawn(io::Error::new(
                io::ErrorKind::NotFound,
                format!("working directory '{}' does not exist", self.cwd.display()),
            )));
        }

        Command::new(&self.command)
            .args(&self.args)
            .current_dir(&self.cwd)
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RdbgAdapterError::MissingDependency(format!(
                    "'{}' was not found, install the debug gem or set rdbg_path",
                    self.command
                )),
                _ => RdbgAdapterError::Spawn(e),
            })
    }
}

/// Server adapter handed to the host debugging UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(flatten)]
    pub connection: ConnectionDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<SpawnDescriptor>,
}

impl AdapterDescriptor {
    pub fn new(connection: ConnectionDescriptor, executable: Option<SpawnDescriptor>) -> Self {
        Self {
            kind: "server",
            connection,
            executable,
        }
    }
}

/// Editor state read by `workspace`, `file` and `line` targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContext {
    pub cwd: PathBuf,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

impl EditorContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            file: None,
            line: None,
        }
    }

    /// Context rooted at the process working directory.
    pub fn from_env() -> io::Result<Self> {
        std::env::current_dir().map(Self::new)
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// The active file, made absolute against the working directory.
    pub fn absolute_file(&self) -> Option<PathBuf> {
        self.file.as_deref().map(|file| self.absolute(file))
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
