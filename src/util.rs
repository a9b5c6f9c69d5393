//! Timing helpers shared by the harness.

use std::time::{Duration, Instant};

use anyhow::bail;

/// Interval between checks of broker state.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default bound on how long the harness waits for broker state to converge.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(60);

/// Returns a closure that reports whether `duration` has elapsed since this
/// call.
pub fn true_after(duration: Duration) -> impl Fn() -> bool {
    let start = Instant::now();
    move || start.elapsed() > duration
}

/// Polls `cond` once per second until it returns `true`.
///
/// Fails with a descriptive error once `deadline` has elapsed, so an
/// unreachable broker surfaces as a test failure rather than a hung run.
/// `what` names the awaited condition in that error.
pub async fn wait_until<F>(what: &str, deadline: Duration, mut cond: F) -> anyhow::Result<()>
where
    F: FnMut() -> anyhow::Result<bool>,
{
    let start = Instant::now();
    loop {
        if cond()? {
            return Ok(());
        }
        if start.elapsed() > deadline {
            bail!("timed out after {:?} waiting for {}", deadline, what);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_after_flips_once_elapsed() {
        let elapsed = true_after(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(5));
        assert!(elapsed());

        let not_yet = true_after(Duration::from_secs(3600));
        assert!(!not_yet());
    }

    #[tokio::test]
    async fn wait_until_returns_on_first_success() {
        let mut calls = 0;
        wait_until("condition under test", DEFAULT_WAIT, || {
            calls += 1;
            Ok(true)
        })
        .await
        .unwrap();
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn wait_until_times_out() {
        let err = wait_until("a condition that never holds", Duration::ZERO, || Ok(false))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn wait_until_propagates_probe_errors() {
        let err = wait_until("a failing probe", DEFAULT_WAIT, || {
            anyhow::bail!("probe exploded")
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("probe exploded"));
    }
}
