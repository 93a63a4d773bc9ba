use tracing::{debug, info};

use crate::arguments::build_argument_list;
use crate::config::Options;
use crate::configuration::ResolvedConfiguration;
use crate::error::{RdbgAdapterError, Result};
use crate::port::{PortPrompt, resolve_port};
use crate::protocol::{
    AdapterDescriptor, ConnectionDescriptor, DEFAULT_HOST, EditorContext, SpawnDescriptor,
};

/// Turns a resolved configuration into the adapter the host should use for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInvoker {
    rdbg_path: String,
}

pub fn build_adapter_invoker(options: &Options) -> AdapterInvoker {
    AdapterInvoker {
        rdbg_path: options.rdbg_path.clone(),
    }
}

impl AdapterInvoker {
    pub fn rdbg_path(&self) -> &str {
        &self.rdbg_path
    }

    /// Defaults `cwd`, `host` and `port`, then builds the connection and, for
    /// launching configurations, the spawn descriptor.
    ///
    /// Attach-only configurations without a port ask `prompt`; everything else
    /// gets a free local port.
    pub fn resolve(
        &self,
        config: &ResolvedConfiguration,
        ctx: &EditorContext,
        prompt: &mut dyn PortPrompt,
    ) -> Result<AdapterDescriptor> {
        let spawns_debugger = config.spawns_debugger();
        let cwd = config.cwd.clone().unwrap_or_else(|| ctx.cwd.clone());
        let host = config
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match config.port.filter(|port| *port != 0) {
            Some(port) => Some(port),
            None => resolve_port(!spawns_debugger, prompt)?,
        };
        let port = port.ok_or(RdbgAdapterError::PortRequired)?;

        let connection = ConnectionDescriptor { host, port };
        debug!(name = %config.name, host = %connection.host, port, spawns_debugger, "Resolved connection");

        let executable = spawns_debugger.then(|| SpawnDescriptor {
            command: self.rdbg_path.clone(),
            args: build_argument_list(config, &connection, ctx),
            cwd,
        });

        Ok(AdapterDescriptor::new(connection, executable))
    }

    /// Resolves the adapter and hands it to `callback`, the way a host registry expects.
    pub fn invoke<F>(
        &self,
        callback: F,
        config: &ResolvedConfiguration,
        ctx: &EditorContext,
        prompt: &mut dyn PortPrompt,
    ) -> Result<()>
    where
        F: FnOnce(AdapterDescriptor),
    {
        let descriptor = self.resolve(config, ctx, prompt)?;
        info!(name = %config.name, launch = descriptor.executable.is_some(), "Starting debug session");
        callback(descriptor);
        Ok(())
    }
}
