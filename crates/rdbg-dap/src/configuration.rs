use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::Options;

/// Debugger kind every configuration and the adapter are registered under.
pub const DEBUGGER_KIND: &str = "ruby";

/// Whether the adapter starts `rdbg` itself or connects to a running one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Request {
    Launch,
    Attach,
}

/// Trailing argument appended after the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Target {
    /// Active file plus the cursor line, `path:line`
    Line,
    /// Active file
    File,
    /// Working directory of the editor
    Workspace,
    /// Any other string, passed through verbatim
    Literal(String),
}

impl Target {
    /// Parses a raw `target` value. Anything but a string is treated as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(Self::from)
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        match s {
            "line" => Target::Line,
            "file" => Target::File,
            "workspace" => Target::Workspace,
            other => Target::Literal(other.to_string()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Line => write!(f, "line"),
            Target::File => write!(f, "file"),
            Target::Workspace => write!(f, "workspace"),
            Target::Literal(s) => write!(f, "{}", s),
        }
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

fn default_kind() -> String {
    DEBUGGER_KIND.to_string()
}

/// A named debug configuration as the user writes it.
///
/// `args` and `target` are kept as raw values so that malformed entries can be
/// demoted to "absent" during resolution instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonstop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Configuration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: default_kind(),
            args: None,
            target: None,
            nonstop: None,
            request: None,
            cwd: None,
            host: None,
            port: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(Value::Array(
            args.into_iter().map(|a| Value::String(a.into())).collect(),
        ));
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(Value::String(target.into()));
        self
    }

    pub fn with_nonstop(mut self, nonstop: bool) -> Self {
        self.nonstop = Some(nonstop);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Applies defaults, using `global_nonstop` when the configuration does not set its own.
    pub fn resolve(&self, global_nonstop: bool) -> ResolvedConfiguration {
        let args = valid_args(self.args.as_ref());
        let target = self.target.as_ref().and_then(Target::from_value);

        if self.args.is_some() && args.is_none() {
            debug!(name = %self.name, "Ignoring args that are not a non-empty list of strings");
        }
        if self.target.is_some() && target.is_none() {
            debug!(name = %self.name, "Ignoring non-string target");
        }

        let spawns_debugger = args.is_some() || target.is_some();
        let request = if spawns_debugger {
            Request::Launch
        } else {
            Request::Attach
        };

        if let Some(requested) = self.request
            && requested != request
        {
            debug!(name = %self.name, ?requested, ?request, "Overriding request");
        }

        ResolvedConfiguration {
            name: self.name.clone(),
            kind: self.kind.clone(),
            request,
            localfs: true,
            nonstop: self.nonstop.unwrap_or(global_nonstop),
            args,
            target,
            cwd: self.cwd.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}

/// `args` counts only when it is a non-empty list made entirely of strings.
fn valid_args(args: Option<&Value>) -> Option<Vec<String>> {
    let items = args?.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// A configuration with every default applied, ready to be handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfiguration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub request: Request,
    pub localfs: bool,
    pub nonstop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl ResolvedConfiguration {
    #[inline(always)]
    pub fn spawns_debugger(&self) -> bool {
        self.args.is_some() || self.target.is_some()
    }
}

/// Built-in configurations, in the order they are offered to the user.
pub fn default_configurations() -> Vec<Configuration> {
    vec![
        Configuration::new("run current file").with_target("file"),
        Configuration::new("run current file (bundler)")
            .with_args(["bundle", "exec", "ruby"])
            .with_target("file"),
        Configuration::new("rspec current file")
            .with_args(["rspec"])
            .with_target("file"),
        Configuration::new("rspec current line")
            .with_args(["rspec"])
            .with_target("line"),
        Configuration::new("rspec workspace")
            .with_args(["rspec"])
            .with_target("workspace"),
        Configuration::new("rspec current file (bundler)")
            .with_args(["bundle", "exec", "rspec"])
            .with_target("file"),
        Configuration::new("rspec current line (bundler)")
            .with_args(["bundle", "exec", "rspec"])
            .with_target("line"),
        Configuration::new("rspec workspace (bundler)")
            .with_args(["bundle", "exec", "rspec"])
            .with_target("workspace"),
        Configuration::new("rails server").with_args(["bin/rails", "server"]),
        Configuration::new("rails server (bundler)").with_args(["bundle", "exec", "rails", "server"]),
        Configuration::new("rackup (bundler)").with_args(["bundle", "exec", "rackup"]),
        Configuration::new("attach to existing session"),
    ]
}

/// Resolves the built-in configurations (when enabled) followed by the user's own.
pub fn build_configuration_list(options: &Options) -> Vec<ResolvedConfiguration> {
    let defaults = if options.should_include_default_configurations {
        default_configurations()
    } else {
        Vec::new()
    };

    let configurations: Vec<ResolvedConfiguration> = defaults
        .iter()
        .chain(options.configurations.iter())
        .map(|config| config.resolve(options.nonstop))
        .collect();

    debug!(
        count = configurations.len(),
        defaults = defaults.len(),
        "Built configuration list"
    );
    configurations
}
