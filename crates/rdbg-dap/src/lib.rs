//! Debug adapter configuration for the Ruby `rdbg` debugger.
//!
//! This crate turns user options and named debug configurations into what a
//! host debugging UI needs to run `rdbg`: a list of resolved configurations
//! and, per session, a server adapter descriptor with connection details and,
//! when the configuration launches the program, the `rdbg` command line.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rdbg_dap::config::UserOptions;
//! use rdbg_dap::port::TerminalPrompt;
//! use rdbg_dap::protocol::EditorContext;
//!
//! let registration = rdbg_dap::setup(UserOptions::default());
//! let config = registration.find("rspec current file").unwrap();
//! let ctx = EditorContext::new("/home/dev/app").with_file("spec/user_spec.rb");
//!
//! let descriptor = registration
//!     .adapter
//!     .resolve(config, &ctx, &mut TerminalPrompt::new())
//!     .unwrap();
//! println!("{}", serde_json::to_string(&descriptor).unwrap());
//! ```
pub mod adapter;
pub mod arguments;
pub mod cli;
pub mod config;
pub mod configuration;
pub mod error;
pub mod log;
pub mod port;
pub mod protocol;

use tracing::info;

use crate::adapter::{AdapterInvoker, build_adapter_invoker};
use crate::config::{Options, UserOptions, merge_options};
use crate::configuration::{DEBUGGER_KIND, ResolvedConfiguration, build_configuration_list};
use crate::error::{RdbgAdapterError, Result};

pub use cli::Cli;

/// Everything the host registers for the `ruby` debugger kind.
#[derive(Debug, Clone)]
pub struct Registration {
    pub options: Options,
    pub configurations: Vec<ResolvedConfiguration>,
    pub adapter: AdapterInvoker,
}

impl Registration {
    pub const ADAPTER_TYPE: &'static str = DEBUGGER_KIND;

    pub fn find(&self, name: &str) -> Result<&ResolvedConfiguration> {
        self.configurations
            .iter()
            .find(|config| config.name == name)
            .ok_or_else(|| RdbgAdapterError::UnknownConfiguration(name.to_string()))
    }
}

/// Merges `user` with the defaults and builds the configuration list and adapter.
pub fn setup(user: UserOptions) -> Registration {
    let options = merge_options(user);
    let configurations = build_configuration_list(&options);
    let adapter = build_adapter_invoker(&options);

    info!(
        adapter = Registration::ADAPTER_TYPE,
        configurations = configurations.len(),
        "Registered rdbg adapter"
    );

    Registration {
        options,
        configurations,
        adapter,
    }
}
