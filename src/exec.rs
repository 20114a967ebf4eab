//! External tool invocation

use std::process::Command;

use anyhow::{bail, Context};

/// Run an external tool to completion, inheriting stdio. Launch failures
/// and non-zero exit statuses are both hard errors.
pub fn run_tool(program: &str, args: &[String]) -> anyhow::Result<()> {
    tracing::debug!(program, ?args, "running external tool");
    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to launch {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}
