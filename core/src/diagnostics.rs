//! Forgotten-`exec` diagnostic
//!
//! A chain that registers cases but is dropped without `exec()` never runs
//! any handler. When the check is enabled, such a drop is reported through
//! `tracing::warn!`. The check is off by default and never panics.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

static FORGOTTEN_EXEC_CHECK: AtomicBool = AtomicBool::new(false);

thread_local! {
    static FORGOTTEN_EXEC_COUNT: Cell<usize> = const { Cell::new(0) };
}

/// Enable or disable the forgotten-`exec` warning process-wide.
pub fn set_forgotten_exec_check(enabled: bool) {
    FORGOTTEN_EXEC_CHECK.store(enabled, Ordering::Relaxed);
}

/// Whether the forgotten-`exec` warning is enabled.
#[must_use]
pub fn forgotten_exec_check() -> bool {
    FORGOTTEN_EXEC_CHECK.load(Ordering::Relaxed)
}

/// Number of forgotten chains reported on the current thread.
///
/// Counts only while the check is enabled.
#[must_use]
pub fn forgotten_exec_count() -> usize {
    FORGOTTEN_EXEC_COUNT.with(Cell::get)
}

/// Armed while a chain holds cases that have not been executed.
#[derive(Debug, Default)]
pub(crate) struct ExecGuard {
    armed: bool,
    cases: usize,
}

impl ExecGuard {
    pub(crate) fn record_case(&mut self) {
        self.armed = true;
        self.cases += 1;
    }

    /// Consume the guard without reporting.
    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ExecGuard {
    fn drop(&mut self) {
        if !self.armed || std::thread::panicking() || !forgotten_exec_check() {
            return;
        }
        FORGOTTEN_EXEC_COUNT.with(|c| c.set(c.get() + 1));
        tracing::warn!(
            cases = self.cases,
            "matching chain dropped without exec(); no handler ran"
        );
    }
}
