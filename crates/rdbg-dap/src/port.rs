use std::io::{self, IsTerminal};
use std::net::{Ipv4Addr, TcpListener};

use rustyline::config::Behavior;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use tracing::{debug, warn};

use crate::error::{RdbgAdapterError, Result};

/// Source of a port number when attaching to a debuggee the user started.
pub trait PortPrompt {
    /// Blocks until the user supplies a port. `None` means no port was given.
    fn ask_port(&mut self) -> Result<Option<u16>>;
}

/// Asks for the port on the controlling terminal with `rustyline`.
///
/// When stdin is not a terminal the port is read from it without echoing a
/// prompt, so stdout only ever carries the descriptor.
#[derive(Default)]
pub struct TerminalPrompt {
    editor: Option<DefaultEditor>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    fn editor(&mut self) -> Result<&mut DefaultEditor> {
        let editor = match self.editor.take() {
            Some(editor) => editor,
            None => {
                let behavior = if io::stdin().is_terminal() {
                    Behavior::PreferTerm
                } else {
                    Behavior::Stdio
                };
                let config = Config::builder()
                    .behavior(behavior)
                    .auto_add_history(false)
                    .build();
                DefaultEditor::with_config(config)?
            }
        };

        Ok(self.editor.insert(editor))
    }
}

impl PortPrompt for TerminalPrompt {
    fn ask_port(&mut self) -> Result<Option<u16>> {
        let editor = self.editor()?;
        read_port(|| editor.readline("Port: "))
    }
}

/// Reads lines until one holds a valid port. An empty line, EOF or Ctrl-C
/// means no port was given.
fn read_port<F>(mut read_line: F) -> Result<Option<u16>>
where
    F: FnMut() -> std::result::Result<String, ReadlineError>,
{
    loop {
        let line = match read_line() {
            Ok(line) => line,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(None),
            Err(e) => return Err(RdbgAdapterError::Prompt(e)),
        };

        let input = line.trim();
        if input.is_empty() {
            return Ok(None);
        }

        match input.parse::<u16>() {
            Ok(port) if port != 0 => return Ok(Some(port)),
            _ => warn!(input = %input, "Invalid port"),
        }
    }
}

/// Binds an ephemeral listener on the loopback interface and returns the port
/// the OS assigned. The listener is closed before returning, so the port is
/// only known to have been free at that moment.
pub fn free_local_port() -> Result<u16> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .map_err(RdbgAdapterError::SocketUnavailable)?;
    let port = listener
        .local_addr()
        .map_err(RdbgAdapterError::SocketUnavailable)?
        .port();
    drop(listener);

    debug!(port, "Found free port");
    Ok(port)
}

/// Prompts when `must_prompt` is set, otherwise asks the OS for a free local port.
pub fn resolve_port(must_prompt: bool, prompt: &mut dyn PortPrompt) -> Result<Option<u16>> {
    if must_prompt {
        let port = prompt.ask_port()?;
        if port.is_none() {
            warn!("No port supplied");
        }
        return Ok(port);
    }

    free_local_port().map(Some)
}
