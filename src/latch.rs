use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Input lock shared between the worker and whoever submits human rolls.
/// Engaging is a compare-and-swap, so two quick clicks cannot both get through.
#[derive(Debug, Clone, Default)]
pub struct Latch(Arc<AtomicBool>);

impl Latch {
    /// Locks input. False if it was already locked.
    pub fn engage(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
    pub fn set(&self, locked: bool) {
        self.0.store(locked, Ordering::Release);
    }
    pub fn is_locked(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn engages_once() {
        let latch = Latch::default();
        let other = latch.clone();
        assert!(latch.engage());
        assert!(!other.engage());
        assert!(other.is_locked());
        latch.set(false);
        assert!(other.engage());
    }
}
