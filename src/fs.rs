//! Working-directory scoping.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

/// Changes the process working directory for the lifetime of the guard.
///
/// The original directory is restored on drop, including during a panic
/// unwind. The working directory is process-global state, so tests holding a
/// guard must not run concurrently with other tests that read or change it;
/// prefer passing a directory to the code under test (as
/// [`run_script_and_cancel`](crate::process::run_script_and_cancel) does)
/// where the API allows it.
#[derive(Debug)]
pub struct DirGuard {
    original: PathBuf,
}

impl DirGuard {
    /// Changes into `path`, returning a guard that restores the previous
    /// working directory when dropped.
    pub fn change_to<P: AsRef<Path>>(path: P) -> io::Result<DirGuard> {
        let original = env::current_dir()?;
        env::set_current_dir(path)?;
        Ok(DirGuard { original })
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.original) {
            warn!(
                "failed to restore working directory to {}: {}",
                self.original.display(),
                err
            );
        }
    }
}

/// Runs `f` with the working directory set to `path`, restoring it afterwards.
pub fn with_dir<P, T>(path: P, f: impl FnOnce() -> T) -> io::Result<T>
where
    P: AsRef<Path>,
{
    let _guard = DirGuard::change_to(path)?;
    Ok(f())
}
