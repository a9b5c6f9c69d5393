//! Running scripts that must be cancelled mid-flight.

use std::fs;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use log::debug;
use tempfile::TempDir;

/// Writes `script` to `script_file` inside a fresh temporary directory, runs
/// `cmd` there, lets it run for `cancel_after`, then terminates it and
/// returns its combined stdout and stderr.
///
/// `cmd` is split on whitespace; the first token is the program, the rest its
/// arguments. The temporary directory is passed to the child as its working
/// directory rather than by changing this process's, and is removed when the
/// call returns. On unix termination is SIGTERM, giving the child a chance to
/// exit cleanly; elsewhere it is a hard kill. A spawn failure propagates to
/// the caller.
///
/// The two streams are captured separately and concatenated, stdout first,
/// so a child writing to both will not see its lines interleaved in the
/// order it emitted them.
pub fn run_script_and_cancel(
    script: &str,
    script_file: &str,
    cmd: &str,
    cancel_after: Duration,
) -> anyhow::Result<Vec<u8>> {
    let dir = TempDir::new().context("error creating temporary directory")?;
    let script_path = dir.path().join(script_file);
    fs::write(&script_path, script)
        .with_context(|| format!("error writing {}", script_path.display()))?;

    let mut parts = cmd.split_whitespace();
    let program = parts.next().context("empty command")?;
    let mut child = Command::new(program)
        .args(parts)
        .current_dir(dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("error spawning `{}`", cmd))?;

    thread::sleep(cancel_after);

    debug!("terminating `{}` after {:?}", cmd, cancel_after);
    terminate(&mut child)?;
    let output = child
        .wait_with_output()
        .context("error waiting for terminated child")?;

    let mut combined = output.stdout;
    combined.extend_from_slice(&output.stderr);
    Ok(combined)
}

#[cfg(unix)]
fn terminate(child: &mut Child) -> anyhow::Result<()> {
    let rc = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGTERM) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        // The child may already have exited on its own.
        if err.raw_os_error() == Some(libc::ESRCH) {
            return Ok(());
        }
        return Err(err).context("error signalling child");
    }
    Ok(())
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) -> anyhow::Result<()> {
    if child.try_wait().context("error checking child status")?.is_some() {
        return Ok(());
    }
    child.kill().context("error killing child")
}
