use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag shared between the interrupt handler and the poll loops.
///
/// Loops check it between poll cycles, so a request takes effect within one
/// poll interval.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Install a SIGINT/SIGTERM handler that requests shutdown.
    pub fn install_signal_handler(&self) -> Result<(), ctrlc::Error> {
        let shutdown = self.clone();
        ctrlc::set_handler(move || {
            tracing::info!("shutdown requested");
            shutdown.request();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Shutdown;

    #[test]
    fn clones_share_the_same_flag() {
        let shutdown = Shutdown::new();
        let observer = shutdown.clone();

        assert!(!observer.is_requested());
        shutdown.request();
        assert!(observer.is_requested());
    }
}
