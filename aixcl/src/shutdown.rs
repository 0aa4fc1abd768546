//! Cooperative shutdown controller.
//!
//! `start` wires this to Ctrl-C so the readiness prober can stop between rounds
//! instead of being killed mid-report. A second Ctrl-C exits immediately.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{info, warn};

/// Exit status used when a second interrupt aborts the process (128 + SIGINT).
pub const FORCED_EXIT_CODE: i32 = 130;

/// Cooperative shutdown signal.
///
/// Cloning shares the same underlying flag.
#[derive(Clone, Debug, Default)]
pub struct ShutdownController {
    requested: Arc<AtomicBool>,
}

impl ShutdownController {
    /// Create a controller with no shutdown requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Request shutdown.
    ///
    /// Returns `false` if shutdown had already been requested.
    pub fn request_shutdown(&self) -> bool {
        !self.requested.swap(true, Ordering::SeqCst)
    }

    /// Request shutdown when the process receives Ctrl-C.
    ///
    /// Registering the handler replaces the default SIGINT behavior, so a
    /// repeated Ctrl-C exits the process with [`FORCED_EXIT_CODE`].
    /// Must be called from within a tokio runtime.
    pub fn request_on_ctrl_c(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if controller.request_shutdown() {
                    info!("Interrupt received, stopping after the current round");
                } else {
                    warn!("Second interrupt received, exiting");
                    std::process::exit(FORCED_EXIT_CODE);
                }
            }
        });
    }
}
