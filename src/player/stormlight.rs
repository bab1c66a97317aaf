//! Stormlight resource ledger.
//!
//! A single clamped-at-zero scalar with an additive drain model: the
//! depletion rate is recomputed every tick as the sum of independently named
//! contributions, so simultaneous drains stack. Deposits may exceed the
//! capacity (infusion refunds can overcharge); `settle_overcap` clamps back
//! down when the charging ability is released.

/// Named per-second drain contributions, summed additively.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrainRates {
    pub base: f32,
    pub healing: f32,
    pub infusing: f32,
    pub lashing: f32,
    pub movement: f32,
}

impl DrainRates {
    pub fn total(&self) -> f32 {
        self.base + self.healing + self.infusing + self.lashing + self.movement
    }
}

#[derive(Debug, Clone)]
pub struct Stormlight {
    current: f32,
    capacity: f32,
    depletion_rate: f32,
    pub drains: DrainRates,
}

impl Stormlight {
    /// New ledger, full at `capacity`.
    pub fn new(capacity: f32) -> Self {
        Self {
            current: capacity,
            capacity,
            depletion_rate: 0.0,
            drains: DrainRates::default(),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn capacity(&self) -> f32 {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Force the stored value; floors at zero. Used by scripted scenarios.
    pub fn set_current(&mut self, value: f32) {
        self.current = value.max(0.0);
    }

    /// Sum the drain contributions into the active depletion rate.
    pub fn recompute_rate(&mut self) -> f32 {
        self.depletion_rate = self.drains.total();
        self.depletion_rate
    }

    pub fn depletion_rate(&self) -> f32 {
        self.depletion_rate
    }

    /// Apply the active depletion rate over `dt`, clamping at zero.
    pub fn drain(&mut self, dt: f32) {
        self.current = (self.current - self.depletion_rate * dt).max(0.0);
    }

    /// Add a signed yield from an interaction. Negative yields refund cost;
    /// the floor at zero still holds, but no ceiling is applied here.
    pub fn deposit(&mut self, amount: f32) {
        self.current = (self.current + amount).max(0.0);
    }

    /// Clamp any overcharge back down to capacity.
    pub fn settle_overcap(&mut self) {
        if self.current > self.capacity {
            self.current = self.capacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_negative_across_drain_sequences() {
        let mut s = Stormlight::new(10.0);
        s.drains.base = 3.0;
        s.drains.lashing = 50.0;
        s.recompute_rate();
        for _ in 0..100 {
            s.drain(1.0 / 60.0);
            assert!(s.current() >= 0.0);
        }
        assert!(s.is_empty());
    }

    #[test]
    fn test_drains_stack_additively() {
        let mut s = Stormlight::new(100.0);
        s.drains = DrainRates {
            base: 1.0,
            healing: 2.0,
            infusing: 3.0,
            lashing: 4.0,
            movement: 5.0,
        };
        assert_eq!(s.recompute_rate(), 15.0);
        s.drain(1.0);
        assert!((s.current() - 85.0).abs() < 1.0e-5);
    }

    #[test]
    fn test_rate_recomputed_not_cached() {
        let mut s = Stormlight::new(100.0);
        s.drains.base = 10.0;
        s.recompute_rate();
        s.drains.base = 0.0;
        s.drains.lashing = 1.0;
        assert_eq!(s.recompute_rate(), 1.0);
    }

    #[test]
    fn test_deposit_may_overcap_then_settles() {
        let mut s = Stormlight::new(100.0);
        s.deposit(40.0);
        assert!((s.current() - 140.0).abs() < 1.0e-5);
        s.settle_overcap();
        assert_eq!(s.current(), 100.0);
    }

    #[test]
    fn test_negative_deposit_refunds_but_floors_at_zero() {
        let mut s = Stormlight::new(100.0);
        s.set_current(5.0);
        s.deposit(-3.0);
        assert!((s.current() - 2.0).abs() < 1.0e-5);
        s.deposit(-10.0);
        assert_eq!(s.current(), 0.0);
    }
}
