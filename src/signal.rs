use crate::error::Result;
use signal_hook::consts::SIGWINCH;
use signal_hook::{self, SigId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Notifies terminal window resize. The handler only sets a flag and the editor loop checks it
// after each poll of key input
pub struct SigwinchWatcher {
    flag: Arc<AtomicBool>,
    signal_id: SigId,
}

impl SigwinchWatcher {
    pub fn new() -> Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        let signal_id = signal_hook::flag::register(SIGWINCH, Arc::clone(&flag))?;
        Ok(Self { flag, signal_id })
    }

    pub fn notified(&self) -> bool {
        let resized = self.flag.swap(false, Ordering::Relaxed);
        if resized {
            tracing::debug!("Terminal window was resized");
        }
        resized
    }
}

impl Drop for SigwinchWatcher {
    fn drop(&mut self) {
        signal_hook::low_level::unregister(self.signal_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notified_once_per_signal() {
        let watcher = SigwinchWatcher::new().unwrap();
        assert!(!watcher.notified());
        signal_hook::low_level::raise(SIGWINCH).unwrap();
        assert!(watcher.notified());
        assert!(!watcher.notified());
    }
}
