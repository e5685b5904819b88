//! Refresh Signal
//!
//! Opaque "something changed, refetch" token. It carries no data; list
//! controllers always re-read the server instead of patching local rows.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RefreshSignal(u64);

impl RefreshSignal {
    pub fn trigger(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_changes_value() {
        let mut signal = RefreshSignal::default();
        let before = signal;
        signal.trigger();
        assert_ne!(signal, before);
        assert_eq!(signal.generation(), 1);
    }
}
