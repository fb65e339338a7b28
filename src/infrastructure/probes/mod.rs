pub mod http_rpc;
pub mod pm2;
pub mod tmux;
pub mod websocket_rpc;

pub use http_rpc::HttpRpcProbe;
pub use pm2::Pm2Probe;
pub use tmux::TmuxProbe;
pub use websocket_rpc::WebSocketProbe;

use crate::domain::ports::probe::ProbeError;

/// Maximum stderr bytes included in error messages.
const MAX_STDERR_BYTES: usize = 512;

/// Run an external command and return its stdout.
///
/// The child is killed if the returned future is dropped, so a caller-side
/// timeout does not leave processes behind.
async fn run_command(binary: &str, args: &[&str]) -> Result<String, ProbeError> {
    let output = tokio::process::Command::new(binary)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProbeError::Unavailable(format!("{binary} not found"))
            } else {
                ProbeError::CommandFailed(format!("failed to run {binary}: {e}"))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(
            &output.stderr[..output.stderr.len().min(MAX_STDERR_BYTES)],
        );
        return Err(ProbeError::CommandFailed(format!(
            "{binary} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
