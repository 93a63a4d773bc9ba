use tracing::warn;

use crate::configuration::{ResolvedConfiguration, Target};
use crate::protocol::{ConnectionDescriptor, EditorContext};

/// Builds the `rdbg` command line for a launching configuration.
///
/// The order is fixed: `--nonstop`, `--open --host H --port P`,
/// `--command -- ARGS...`, then the target token.
pub fn build_argument_list(
    config: &ResolvedConfiguration,
    connection: &ConnectionDescriptor,
    ctx: &EditorContext,
) -> Vec<String> {
    let mut args = Vec::new();

    // Observed to behave inversely between platforms in rdbg; passed through unchanged.
    if config.nonstop {
        args.push("--nonstop".to_string());
    }

    args.extend([
        "--open".to_string(),
        "--host".to_string(),
        connection.host.clone(),
        "--port".to_string(),
        connection.port.to_string(),
    ]);

    if let Some(command) = &config.args {
        args.push("--command".to_string());
        args.push("--".to_string());
        args.extend(command.iter().cloned());
    }

    if let Some(target) = &config.target
        && let Some(token) = target_token(target, ctx)
    {
        args.push(token);
    }

    args
}

fn target_token(target: &Target, ctx: &EditorContext) -> Option<String> {
    match target {
        Target::Workspace => Some(ctx.cwd.display().to_string()),
        Target::File => active_file(ctx, target),
        Target::Line => {
            let file = active_file(ctx, target)?;
            match ctx.line {
                Some(line) => Some(format!("{}:{}", file, line)),
                None => {
                    warn!("No active line, targeting the whole file");
                    Some(file)
                }
            }
        }
        Target::Literal(token) => Some(token.clone()),
    }
}

fn active_file(ctx: &EditorContext, target: &Target) -> Option<String> {
    let file = ctx.absolute_file();
    if file.is_none() {
        warn!(kind = %target, "No active file, dropping target");
    }
    file.map(|f| f.display().to_string())
}
