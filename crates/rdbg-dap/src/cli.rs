use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;
use serde::Serialize;

use crate::Registration;
use crate::config::UserOptions;
use crate::port::TerminalPrompt;
use crate::protocol::{AdapterDescriptor, EditorContext};

#[derive(Parser, Debug)]
#[command(name = "rdbg-dap")]
#[command(version)]
#[command(after_help = "Examples:\n\n\
    To list the available configurations:\n\
    $ rdbg-dap configurations\n\n\
    To build the adapter for the RSpec example under the cursor:\n\
    $ rdbg-dap adapter 'rspec current line' --file spec/user_spec.rb --line 12\n\n\
    To start rdbg for the current file:\n\
    $ rdbg-dap launch 'run current file' --file app.rb")]
#[command(
    about = "rdbg-dap builds debug adapter descriptors and launch configurations for the Ruby rdbg debugger.",
    long_about = None
)]
pub struct Cli {
    #[clap(flatten)]
    options: OptionArgs,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[clap(subcommand)]
    commands: Commands,
}

#[derive(Clone, Debug, clap::Args, Default)]
struct OptionArgs {
    /// Load options from the file instead of the default location
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the rdbg executable
    #[arg(long, global = true, value_name = "PATH")]
    rdbg_path: Option<String>,

    /// Start the debuggee without stopping at the beginning
    #[arg(long, global = true, default_value_t = false, conflicts_with = "no_nonstop")]
    nonstop: bool,

    /// Stop at the beginning even when the options file sets nonstop
    #[arg(long, global = true, default_value_t = false)]
    no_nonstop: bool,

    /// Only offer configurations from the options file
    #[arg(long, global = true, default_value_t = false)]
    no_default_configurations: bool,
}

impl OptionArgs {
    fn user_options(&self) -> UserOptions {
        UserOptions {
            nonstop: match (self.nonstop, self.no_nonstop) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            rdbg_path: self.rdbg_path.clone(),
            configurations: None,
            should_include_default_configurations: self.no_default_configurations.then_some(false),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the resolved configurations as JSON
    Configurations,
    /// Print the adapter descriptor for a configuration as JSON
    Adapter(SessionArgs),
    /// Start rdbg for a configuration and print its adapter descriptor
    Launch(SessionArgs),
}

#[derive(Clone, Debug, clap::Args)]
struct SessionArgs {
    /// Name of the configuration
    name: String,

    /// Working directory of the editor, defaults to the current directory
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Active file, used by `file` and `line` targets
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Cursor line in the active file, used by `line` targets
    #[arg(long)]
    line: Option<u32>,

    /// Host rdbg listens on
    #[arg(long)]
    host: Option<String>,

    /// Port rdbg listens on
    #[arg(long)]
    port: Option<u16>,
}

impl SessionArgs {
    fn editor_context(&self) -> io::Result<EditorContext> {
        let mut ctx = match &self.cwd {
            Some(cwd) => EditorContext::new(cwd),
            None => EditorContext::from_env()?,
        };
        ctx.file = self.file.clone();
        ctx.line = self.line;
        Ok(ctx)
    }
}

#[derive(Serialize)]
struct LaunchOutput {
    adapter: AdapterDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u32>,
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        crate::log::init(self.log_level.as_deref());

        let file_options = UserOptions::load(self.options.config.as_deref()).into_diagnostic()?;
        let registration = crate::setup(self.options.user_options().merge(file_options));

        match &self.commands {
            Commands::Configurations => print_json(&registration.configurations),
            Commands::Adapter(args) => {
                let descriptor = Self::resolve(&registration, args)?;
                print_json(&descriptor)
            }
            Commands::Launch(args) => {
                let descriptor = Self::resolve(&registration, args)?;
                let pid = match &descriptor.executable {
                    Some(executable) => Some(executable.spawn().into_diagnostic()?.id()),
                    None => None,
                };
                print_json(&LaunchOutput {
                    adapter: descriptor,
                    pid,
                })
            }
        }
    }

    fn resolve(registration: &Registration, args: &SessionArgs) -> miette::Result<AdapterDescriptor> {
        let mut config = registration.find(&args.name).into_diagnostic()?.clone();
        if let Some(host) = &args.host {
            config.host = Some(host.clone());
        }
        if let Some(port) = args.port {
            config.port = Some(port);
        }

        let ctx = args.editor_context().into_diagnostic()?;
        registration
            .adapter
            .resolve(&config, &ctx, &mut TerminalPrompt::new())
            .into_diagnostic()
    }
}

fn print_json<T: Serialize>(value: &T) -> miette::Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).into_diagnostic()?;
    handle.flush().into_diagnostic()
}
