//! Delayed phase transitions
//!
//! Timers are owned by the session and advanced with frame time. Any phase
//! change clears the whole list, so a stale transition can never fire.

/// Transitions that happen after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Fuel ran dry while flying; re-checked when it fires
    FuelExhausted,
    /// Explosion finished, show the game-over caption
    ExplosionFinished,
    /// Caption finished, back to the menu
    ReturnToMenu,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    transition: Transition,
    /// Seconds left
    remaining: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a transition; an already armed one keeps its original deadline
    pub fn schedule(&mut self, transition: Transition, delay: f64) {
        if self.is_scheduled(transition) {
            return;
        }
        self.pending.push(Pending {
            transition,
            remaining: delay,
        });
    }

    pub fn is_scheduled(&self, transition: Transition) -> bool {
        self.pending.iter().any(|p| p.transition == transition)
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Count every timer down by `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        for p in &mut self.pending {
            p.remaining -= dt;
        }
    }

    /// Remove and return the earliest expired transition
    pub fn pop_due(&mut self) -> Option<Transition> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.remaining <= 1e-9)
            .min_by(|(_, a), (_, b)| a.remaining.total_cmp(&b.remaining))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx).transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = Timers::new();
        timers.schedule(Transition::ExplosionFinished, 3.0);
        timers.advance(2.9);
        assert_eq!(timers.pop_due(), None);
        timers.advance(0.1);
        assert_eq!(timers.pop_due(), Some(Transition::ExplosionFinished));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_earliest_first() {
        let mut timers = Timers::new();
        timers.schedule(Transition::ReturnToMenu, 2.0);
        timers.schedule(Transition::ExplosionFinished, 1.0);
        timers.advance(5.0);
        assert_eq!(timers.pop_due(), Some(Transition::ExplosionFinished));
        assert_eq!(timers.pop_due(), Some(Transition::ReturnToMenu));
        assert_eq!(timers.pop_due(), None);
    }

    #[test]
    fn test_schedule_does_not_reset_deadline() {
        let mut timers = Timers::new();
        timers.schedule(Transition::FuelExhausted, 0.1);
        timers.advance(0.06);
        timers.schedule(Transition::FuelExhausted, 0.1);
        timers.advance(0.05);
        assert_eq!(timers.pop_due(), Some(Transition::FuelExhausted));
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::new();
        timers.schedule(Transition::FuelExhausted, 0.1);
        timers.cancel_all();
        timers.advance(1.0);
        assert_eq!(timers.pop_due(), None);
    }
}
