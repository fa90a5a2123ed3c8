//! Scoped process-state helpers.
//!
//! Config modules may read paths relative to their own directory (a
//! `.gitignore` next to the config, for instance), so the loader has to run
//! with the working directory pinned to the config's directory. The working
//! directory is process-global state; both helpers here guarantee
//! restoration on every exit path, including panics.

use std::io;
use std::path::{Path, PathBuf};

use tracing::level_filters::LevelFilter;

/// Restores the saved working directory when dropped.
struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    fn change_to(dir: &Path) -> io::Result<Self> {
        let original = std::env::current_dir()?;
        std::env::set_current_dir(dir)?;
        Ok(Self { original })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        // Nothing sensible to do if the original directory vanished.
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Run `op` with the process working directory set to `dir`.
///
/// The previous working directory is restored after `op` returns, whether it
/// completes normally, returns an error value, or panics.
pub fn run_in_directory<T>(dir: &Path, op: impl FnOnce() -> T) -> io::Result<T> {
    let _guard = CwdGuard::change_to(dir)?;
    Ok(op())
}

/// Run `op` with info/debug/trace log output suppressed.
///
/// Warn and error events still pass through. Useful around config loading
/// when the output feeds a JSON pipeline where stray logs would break
/// parsing. The previous subscriber is restored once `op` settles.
pub fn run_silently<T>(op: impl FnOnce() -> T) -> T {
    let quiet = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::WARN)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::with_default(quiet, op)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    // Tests that touch the process working directory must not interleave.
    pub static CWD_LOCK: Mutex<()> = Mutex::new(());
}

#[cfg(test)]
mod tests {
    use super::test_support::CWD_LOCK;
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[test]
    fn test_runs_op_in_target_directory() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let target = dir.path().canonicalize().unwrap();

        let observed = run_in_directory(&target, || std::env::current_dir().unwrap()).unwrap();
        assert_eq!(observed, target);
    }

    #[test]
    fn test_restores_cwd_on_success() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let before = std::env::current_dir().unwrap();

        run_in_directory(dir.path(), || ()).unwrap();
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_restores_cwd_on_panic() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let before = std::env::current_dir().unwrap();

        let result = catch_unwind(AssertUnwindSafe(|| {
            run_in_directory(dir.path(), || panic!("boom")).unwrap();
        }));
        assert!(result.is_err());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_nonexistent_directory_is_an_error() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let result = run_in_directory(&missing, || ());
        assert!(result.is_err());
    }

    static EVENTS: AtomicUsize = AtomicUsize::new(0);

    struct CountingSubscriber;

    impl tracing::Subscriber for CountingSubscriber {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }
        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}
        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}
        fn event(&self, _: &tracing::Event<'_>) {
            EVENTS.fetch_add(1, Ordering::SeqCst);
        }
        fn enter(&self, _: &tracing::span::Id) {}
        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn test_run_silently_suppresses_info_and_restores() {
        EVENTS.store(0, Ordering::SeqCst);

        tracing::subscriber::with_default(CountingSubscriber, || {
            tracing::info!("before");
            let value = run_silently(|| {
                // Swallowed by the scoped WARN-filtered subscriber.
                tracing::info!("inside");
                tracing::debug!("inside too");
                42
            });
            assert_eq!(value, 42);
            tracing::info!("after");
        });

        // Only the two events outside the silent scope reached the counter.
        assert_eq!(EVENTS.load(Ordering::SeqCst), 2);
    }
}
