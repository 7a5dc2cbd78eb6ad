use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared cancellation flag between the caller and a running search.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns a guard that raises the flag when dropped, unless disarmed.
    pub fn stop_on_drop(&self) -> StopOnDrop {
        StopOnDrop {
            flag: self.clone(),
            armed: true,
        }
    }
}

pub struct StopOnDrop {
    flag: StopFlag,
    armed: bool,
}

impl StopOnDrop {
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.flag.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_stops_on_drop() {
        let flag = StopFlag::new();
        {
            let _guard = flag.stop_on_drop();
        }
        assert!(flag.is_stopped());
    }

    #[test]
    fn test_disarmed_guard() {
        let flag = StopFlag::new();
        flag.stop_on_drop().disarm();
        assert!(!flag.is_stopped());
    }
}
