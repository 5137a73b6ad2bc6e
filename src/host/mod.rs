//! Host abstraction layer
//!
//! Handles what the embedding environment provides:
//! - Wall-clock time (for high-score timestamps)
//! - Key mapping for keyboard hosts

use std::cell::Cell;
use std::rc::Rc;

use chrono::Utc;

/// Wall-clock source in Unix milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        Utc::now().timestamp_millis() as f64
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Held controls the player can set or clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    RotateLeft,
    RotateRight,
    Thrust,
}

/// Map a DOM-style key code (`KeyboardEvent.code`) to a control
pub fn control_for_key(code: &str) -> Option<Control> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Control::RotateLeft),
        "ArrowRight" | "KeyD" => Some(Control::RotateRight),
        "ArrowUp" | "KeyW" | "Space" => Some(Control::Thrust),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(control_for_key("ArrowLeft"), Some(Control::RotateLeft));
        assert_eq!(control_for_key("KeyD"), Some(Control::RotateRight));
        assert_eq!(control_for_key("Space"), Some(Control::Thrust));
        assert_eq!(control_for_key("KeyW"), Some(Control::Thrust));
        assert_eq!(control_for_key("Escape"), None);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(1000.0);
        let view = clock.clone();
        clock.advance(500.0);
        assert_eq!(view.now_ms(), 1500.0);
        view.set(42.0);
        assert_eq!(clock.now_ms(), 42.0);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000.0);
    }
}
