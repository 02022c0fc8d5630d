//! Availability checks for external programs.

use std::process::Stdio;
use tokio::process::Command;

/// Check that `program` can be started.
///
/// Only a failure to spawn counts as "missing": some converters print usage
/// and exit non-zero for a version flag, which still proves they are installed.
pub async fn check(program: &str, args: &[&str]) -> std::io::Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await?;
    tracing::trace!("Probe {} {:?} exited with {}", program, args, status);
    Ok(())
}

/// Convenience wrapper returning a plain bool.
pub async fn is_available(program: &str, args: &[&str]) -> bool {
    check(program, args).await.is_ok()
}
