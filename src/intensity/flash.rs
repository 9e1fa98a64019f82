//! Flash phase for the critical border.
//!
//! The clock only tracks *whether* flashing is active and which half of the
//! square wave is showing. The periodic timer that drives [`FlashClock::toggle`]
//! lives in the [`Scheduler`](crate::scheduler::Scheduler); the service keeps
//! the two in step.
//!
//! ```text
//!   stopped (visible) ──start──▶ running ──toggle──▶ running
//!         ▲                         │   ◀──toggle──     │
//!         └──────────stop───────────┴───────────────────┘
//! ```

/// Square-wave flash state.
#[derive(Debug, Clone)]
pub struct FlashClock {
    running: bool,
    visible: bool,
    toggles: u64,
}

impl Default for FlashClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashClock {
    pub fn new() -> Self {
        Self {
            running: false,
            visible: true,
            toggles: 0,
        }
    }

    /// Start flashing. Returns `false` if it was already running (no-op).
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.toggles = 0;
        true
    }

    /// Stop flashing and force the border back to visible, so it can never
    /// be left stuck in the off phase. Returns `true` if it was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.visible = true;
        was_running
    }

    /// Flip the phase. `None` when not running (stale tick).
    pub fn toggle(&mut self) -> Option<bool> {
        if !self.running {
            return None;
        }
        self.visible = !self.visible;
        self.toggles = self.toggles.wrapping_add(1);
        Some(self.visible)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggles since the last start.
    pub fn toggles(&self) -> u64 {
        self.toggles
    }
}
