use std::io;

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "rdbg_dap=info";

/// Installs the global subscriber. Output goes to stderr so that stdout only
/// carries the JSON the host reads.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        level
            .map(|level| EnvFilter::new(format!("rdbg_dap={}", level)))
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
    });

    // A subscriber may already be installed when embedded in a host.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
