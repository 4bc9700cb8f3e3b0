use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Installs a test-friendly tracing subscriber exactly once per test binary.
///
/// Output goes through the test writer so it is only shown for failing tests.
/// Set `RUST_LOG=dirpane=debug` to see the tree and scan diagnostics.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Returns true when the current process runs as root (UID 0).
/// Root ignores directory permissions, so unreadable-directory tests skip.
#[cfg(test)]
#[inline]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no side effects and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
