use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

/// Shared stop flag, set by the interrupt handler or the stop-file watcher.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

#[derive(Default)]
struct StopInner {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration`, waking early if the signal fires.
    ///
    /// Returns `true` when the signal is set.
    pub async fn sleep(&self, duration: Duration) -> bool {
        let notified = self.inner.notify.notified();
        if self.is_triggered() {
            return true;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = notified => {}
        }
        self.is_triggered()
    }
}

/// Triggers `stop` on Ctrl+C.
pub fn install_interrupt_handler(stop: StopSignal) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Received stop signal, shutting down...");
                stop.trigger();
            }
            Err(err) => {
                log::warn!("Unable to listen for Ctrl+C: {err}");
            }
        }
    });
}

/// Polls for `path` every `interval` until it shows up or `stop` fires elsewhere.
///
/// A found stop file is deleted before the signal is raised.
pub async fn watch_stop_file(path: &Path, stop: &StopSignal, interval: Duration) {
    while !stop.is_triggered() {
        if path.exists() {
            log::info!("Found {}, shutting down...", path.display());
            if let Err(err) = std::fs::remove_file(path) {
                log::warn!("Failed to remove {}: {err}", path.display());
            }
            stop.trigger();
            break;
        }

        if stop.sleep(interval).await {
            break;
        }
    }
}
