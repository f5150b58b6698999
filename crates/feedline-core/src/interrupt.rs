//! Ctrl+C handling.
//!
//! Outside raw mode Ctrl+C arrives as a signal; the handler only sets a flag
//! the event loop polls. A second Ctrl+C restores the terminal and exits.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static RESTORE_HOOK: OnceLock<Box<dyn Fn() + Send + Sync>> = OnceLock::new();

#[derive(Debug)]
pub struct InterruptedError;

impl std::fmt::Display for InterruptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interrupted")
    }
}

impl std::error::Error for InterruptedError {}

/// Installs the Ctrl+C handler.
///
/// # Errors
/// Returns an error if a handler is already registered for this process.
pub fn init() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(trigger_ctrl_c)
}

/// Records an interrupt, force-exiting on the second one.
pub fn trigger_ctrl_c() {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // process::exit() bypasses Drop, so restore the terminal first.
        if let Some(hook) = RESTORE_HOOK.get() {
            hook();
        }
        std::process::exit(130);
    }
}

/// Checks if an interrupt has been requested.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Resets the interrupt flag.
pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Registers a restore hook called on the second Ctrl+C before exit.
pub fn set_restore_hook<F>(hook: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let _ = RESTORE_HOOK.set(Box::new(hook));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interrupt_sets_flag() {
        reset();
        assert!(!is_interrupted());
        trigger_ctrl_c();
        assert!(is_interrupted());
        reset();
        assert!(!is_interrupted());
    }
}
